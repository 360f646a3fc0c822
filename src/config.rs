use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    pub h_margin: f32,
    pub v_margin: f32,
    pub left: f32,
    pub top: f32,
    pub wrap_width: f32,
    /// Horizontal reach of the control points on row-turn curves.
    pub curve_margin: f32,
    /// Distance under which two anchors count as the same row or column.
    pub align_tolerance: f32,
    pub canvas_padding: f32,
}

impl LayoutConfig {
    pub fn right(&self) -> f32 {
        self.left + self.wrap_width
    }

    pub fn column_pitch(&self) -> f32 {
        self.node_width + self.h_margin
    }

    pub fn row_pitch(&self) -> f32 {
        self.node_height + self.v_margin
    }

    /// Parents centered right of this x turn on the right side.
    pub fn turn_threshold(&self) -> f32 {
        (self.left + self.right()) / 2.0 + self.node_width / 2.0
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 350.0,
            node_height: 80.0,
            h_margin: 100.0,
            v_margin: 50.0,
            left: 100.0,
            top: 100.0,
            wrap_width: 1500.0,
            curve_margin: 150.0,
            align_tolerance: 10.0,
            canvas_padding: 500.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub decorations: bool,
    pub star_count: usize,
    pub seed: Option<u64>,
    pub message_max_chars: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            decorations: true,
            star_count: 200,
            seed: None,
            message_max_chars: 40,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::galaxy(),
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background_top: Option<String>,
    background_bottom: Option<String>,
    edge_color: Option<String>,
    flow_color: Option<String>,
    node_main_color: Option<String>,
    node_branch_color: Option<String>,
    node_tip_color: Option<String>,
    node_border_color: Option<String>,
    text_color: Option<String>,
    insertion_color: Option<String>,
    deletion_color: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_width: Option<f32>,
    node_height: Option<f32>,
    h_margin: Option<f32>,
    v_margin: Option<f32>,
    left: Option<f32>,
    top: Option<f32>,
    wrap_width: Option<f32>,
    curve_margin: Option<f32>,
    align_tolerance: Option<f32>,
    canvas_padding: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    decorations: Option<bool>,
    star_count: Option<usize>,
    seed: Option<u64>,
    message_max_chars: Option<usize>,
}

/// Loads a JSON5 config file over the defaults. `None` yields the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "galaxy" | "default" => config.theme = Theme::galaxy(),
            "paper" | "light" => config.theme = Theme::paper(),
            other => log::warn!("unknown theme '{other}', keeping the default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.background_top {
            config.theme.background_top = v;
        }
        if let Some(v) = vars.background_bottom {
            config.theme.background_bottom = v;
        }
        if let Some(v) = vars.edge_color {
            config.theme.edge_color = v;
        }
        if let Some(v) = vars.flow_color {
            config.theme.flow_color = v;
        }
        if let Some(v) = vars.node_main_color {
            config.theme.node_main_color = v;
        }
        if let Some(v) = vars.node_branch_color {
            config.theme.node_branch_color = v;
        }
        if let Some(v) = vars.node_tip_color {
            config.theme.node_tip_color = v;
        }
        if let Some(v) = vars.node_border_color {
            config.theme.node_border_color = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.insertion_color {
            config.theme.insertion_color = v;
        }
        if let Some(v) = vars.deletion_color {
            config.theme.deletion_color = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.node_width {
            config.layout.node_width = v;
        }
        if let Some(v) = layout.node_height {
            config.layout.node_height = v;
        }
        if let Some(v) = layout.h_margin {
            config.layout.h_margin = v;
        }
        if let Some(v) = layout.v_margin {
            config.layout.v_margin = v;
        }
        if let Some(v) = layout.left {
            config.layout.left = v;
        }
        if let Some(v) = layout.top {
            config.layout.top = v;
        }
        if let Some(v) = layout.wrap_width {
            config.layout.wrap_width = v;
        }
        if let Some(v) = layout.curve_margin {
            config.layout.curve_margin = v;
        }
        if let Some(v) = layout.align_tolerance {
            config.layout.align_tolerance = v;
        }
        if let Some(v) = layout.canvas_padding {
            config.layout.canvas_padding = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.decorations {
            config.render.decorations = v;
        }
        if let Some(v) = render.star_count {
            config.render.star_count = v;
        }
        if render.seed.is_some() {
            config.render.seed = render.seed;
        }
        if let Some(v) = render.message_max_chars {
            config.render.message_max_chars = v;
        }
    }

    Ok(config)
}

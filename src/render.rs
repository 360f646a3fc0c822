use crate::config::RenderConfig;
use crate::ir::{Commit, History};
use crate::layout::{Connector, ConnectorPath, Layout, NodeLayout};
use crate::palette::BranchPalette;
use crate::theme::Theme;
use anyhow::Result;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

const NODE_CORNER_RADIUS: f32 = 12.0;
const NODE_OPACITY: f32 = 0.8;
const TEXT_INSET_X: f32 = 10.0;
const GALAXY_RING_SCALES: [f32; 3] = [0.22, 0.30, 0.38];
// Keeps the star field independent of the branch palette for the same seed.
const STAR_SEED_SALT: u64 = 0x5354_4152;

/// Draws background, connectors, node boxes and node text, in that order.
pub fn render_svg(history: &History, layout: &Layout, theme: &Theme, config: &RenderConfig) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&defs_svg(theme));
    svg.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" fill=\"url(#bgGrad)\"/>"
    ));

    if config.decorations {
        svg.push_str(&star_field_svg(width, height, theme, config));
        svg.push_str(&galaxy_svg(width, height, theme));
    }

    log::info!("drawing {} connectors", layout.connectors.len());
    for connector in &layout.connectors {
        svg.push_str(&connector_svg(connector, theme));
    }

    log::info!("drawing {} nodes", layout.nodes.len());
    let mut palette = BranchPalette::new(config.seed);
    let mut drawn = Vec::with_capacity(layout.nodes.len());
    for commit in &history.commits {
        let Some(node) = layout.node(&commit.id) else {
            continue;
        };
        let fill = theme.node_fill(
            history.adjacency.fan_in(&commit.id),
            history.adjacency.fan_out(&commit.id),
            history.on_default_branch(commit),
        );
        let stroke = match commit.branch.as_deref() {
            Some(branch) => palette.color_for(branch),
            None => theme.node_border_color.as_str(),
        };
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{NODE_CORNER_RADIUS}\" ry=\"{NODE_CORNER_RADIUS}\" fill=\"{}\" opacity=\"{NODE_OPACITY}\" stroke=\"{}\" stroke-width=\"2\"/>",
            node.x,
            node.y,
            node.width,
            node.height,
            escape_xml(fill),
            escape_xml(stroke)
        ));
        drawn.push((commit, node));
    }

    // Text goes last so no box covers a neighbour's label.
    for (commit, node) in drawn {
        svg.push_str(&commit_text_svg(commit, node, theme, config));
    }

    svg.push_str("</svg>");
    svg
}

fn defs_svg(theme: &Theme) -> String {
    let mut defs = String::from("<defs>");
    defs.push_str(&format!(
        "<linearGradient id=\"bgGrad\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\"><stop offset=\"0\" stop-color=\"{}\"/><stop offset=\"1\" stop-color=\"{}\"/></linearGradient>",
        escape_xml(&theme.background_top),
        escape_xml(&theme.background_bottom)
    ));
    defs.push_str(&format!(
        "<radialGradient id=\"galaxyGrad\" cx=\"50%\" cy=\"50%\" r=\"65%\"><stop offset=\"0\" stop-color=\"{}\"/><stop offset=\"0.5\" stop-color=\"{}\"/><stop offset=\"1\" stop-color=\"{}\"/></radialGradient>",
        escape_xml(&theme.galaxy_stops[0]),
        escape_xml(&theme.galaxy_stops[1]),
        escape_xml(&theme.galaxy_stops[2])
    ));
    defs.push_str(
        "<style>.flow-line{stroke-dasharray:10 20;stroke-linecap:round;animation:flow 1s linear infinite}@keyframes flow{to{stroke-dashoffset:-30}}</style>",
    );
    defs.push_str(&format!(
        "<marker id=\"arrowHead\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"10\" markerHeight=\"10\" orient=\"auto\"><path d=\"M0,0 L10,5 L0,10 L3,5 Z\" fill=\"{}\"/></marker>",
        escape_xml(&theme.edge_color)
    ));
    defs.push_str("</defs>");
    defs
}

fn star_field_svg(width: f32, height: f32, theme: &Theme, config: &RenderConfig) -> String {
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return String::new();
    }
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ STAR_SEED_SALT),
        None => StdRng::from_entropy(),
    };
    let star_color = escape_xml(&theme.star_color);
    let mut stars = String::new();
    for _ in 0..config.star_count {
        let x: f32 = rng.gen_range(0.0..width);
        let y: f32 = rng.gen_range(0.0..height);
        let r: f32 = rng.gen_range(0.4..1.6);
        let opacity: f32 = rng.gen_range(0.2..0.6);
        stars.push_str(&format!(
            "<circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{r:.2}\" fill=\"{}\" opacity=\"{opacity:.2}\"/>",
            star_color
        ));
    }
    stars
}

fn galaxy_svg(width: f32, height: f32, theme: &Theme) -> String {
    let mut galaxy = format!(
        "<g id=\"galaxy\" transform=\"translate({:.2},{:.2})\">",
        width / 2.0,
        height / 2.0
    );
    galaxy.push_str(&format!(
        "<ellipse cx=\"0\" cy=\"0\" rx=\"{:.2}\" ry=\"{:.2}\" fill=\"url(#galaxyGrad)\" opacity=\"0.25\"/>",
        width * 0.35,
        height * 0.18
    ));
    let base = width.min(height) * 0.5;
    for (scale, color) in GALAXY_RING_SCALES.iter().zip(&theme.galaxy_rings) {
        galaxy.push_str(&format!(
            "<circle cx=\"0\" cy=\"0\" r=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.2\" opacity=\"0.6\"/>",
            base * scale,
            escape_xml(color)
        ));
    }
    galaxy.push_str("</g>");
    galaxy
}

/// Each connector is stroked twice: a translucent arrowed base and a
/// brighter animated dash on top.
fn connector_svg(connector: &Connector, theme: &Theme) -> String {
    let marker = if connector.directed {
        " marker-end=\"url(#arrowHead)\""
    } else {
        ""
    };
    let base = format!(
        "stroke=\"{}\" stroke-width=\"4\" opacity=\"0.6\"{marker}",
        escape_xml(&theme.edge_color)
    );
    let flow = format!(
        "stroke=\"{}\" stroke-width=\"2\" opacity=\"0.8\" class=\"flow-line\"",
        escape_xml(&theme.flow_color)
    );
    match &connector.path {
        ConnectorPath::Line { from, to } => {
            let coords = format!(
                "x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"",
                from.0, from.1, to.0, to.1
            );
            format!("<line {coords} {base}/><line {coords} {flow}/>")
        }
        ConnectorPath::Curve {
            from,
            ctrl1,
            ctrl2,
            to,
        } => {
            let d = format!(
                "M{:.2},{:.2} C{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
                from.0, from.1, ctrl1.0, ctrl1.1, ctrl2.0, ctrl2.1, to.0, to.1
            );
            format!(
                "<path d=\"{d}\" fill=\"none\" {base}/><path d=\"{d}\" fill=\"none\" {flow}/>"
            )
        }
    }
}

fn commit_text_svg(commit: &Commit, node: &NodeLayout, theme: &Theme, config: &RenderConfig) -> String {
    let x = node.x + TEXT_INSET_X;
    let summary = shorten(&flatten_message(&commit.message), config.message_max_chars);
    let font_family = escape_xml(&theme.font_family);
    let text_color = escape_xml(&theme.text_color);
    let mut text = format!(
        "<text x=\"{x:.2}\" y=\"{:.2}\" fill=\"{}\" font-size=\"16px\" font-family=\"{}\">{}</text>",
        node.y + 25.0,
        text_color,
        font_family,
        escape_xml(&summary)
    );
    text.push_str(&format!(
        "<text x=\"{x:.2}\" y=\"{:.2}\" fill=\"{}\" font-size=\"12px\" font-family=\"{}\">Author: {} | Date: {}</text>",
        node.y + 45.0,
        text_color,
        font_family,
        escape_xml(&commit.author),
        format_commit_time(commit.timestamp, commit.offset_minutes)
    ));
    text.push_str(&format!(
        "<text x=\"{x:.2}\" y=\"{:.2}\" font-size=\"12px\" font-family=\"{}\"><tspan fill=\"{}\">Changes: </tspan><tspan fill=\"{}\">+{} / </tspan><tspan fill=\"{}\">-{}</tspan></text>",
        node.y + 65.0,
        font_family,
        text_color,
        escape_xml(&theme.insertion_color),
        commit.stats.insertions,
        escape_xml(&theme.deletion_color),
        commit.stats.deletions
    ));
    text
}

/// Joins lines with spaces and drops other control characters, which XML
/// does not allow in text.
fn flatten_message(message: &str) -> String {
    message
        .trim()
        .replace("\r\n", " ")
        .chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Truncates to `max_chars` characters, appending `...` when cut.
pub fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Formats a commit time in the committer's own timezone.
pub fn format_commit_time(timestamp: i64, offset_minutes: i32) -> String {
    let offset = FixedOffset::east_opt(offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix());
    match DateTime::from_timestamp(timestamp, 0) {
        Some(time) => time.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string(),
        None => "unknown".to_string(),
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "sans-serif".to_string());
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid default size {}x{}", render_cfg.width, render_cfg.height))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .chars()
        .filter(|c| !is_xml_forbidden(*c))
        .collect::<String>()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn is_xml_forbidden(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}')
}

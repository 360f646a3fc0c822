use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background_top: String,
    pub background_bottom: String,
    pub galaxy_stops: [String; 3],
    pub galaxy_rings: [String; 3],
    pub star_color: String,
    pub edge_color: String,
    pub flow_color: String,
    pub node_main_color: String,
    pub node_branch_color: String,
    pub node_tip_color: String,
    /// Fills for commits with 2, 3, 4 and 5+ parents.
    pub merge_colors: [String; 4],
    pub node_border_color: String,
    pub text_color: String,
    pub insertion_color: String,
    pub deletion_color: String,
}

impl Theme {
    pub fn galaxy() -> Self {
        Self {
            font_family: "Consolas, Microsoft YaHei, SimHei".to_string(),
            background_top: "#0a0f1e".to_string(),
            background_bottom: "#000000".to_string(),
            galaxy_stops: [
                "#193b8c".to_string(),
                "#6a1e9a".to_string(),
                "#000000".to_string(),
            ],
            galaxy_rings: [
                "#a0c4ff".to_string(),
                "#b794f6".to_string(),
                "#7dd3fc".to_string(),
            ],
            star_color: "#FFFFFF".to_string(),
            edge_color: "#c8a2ff".to_string(),
            flow_color: "#ffffff".to_string(),
            node_main_color: "#102a6e".to_string(),
            node_branch_color: "#5b2a86".to_string(),
            node_tip_color: "#9370DB".to_string(),
            merge_colors: [
                "#006400".to_string(),
                "#FF7F50".to_string(),
                "#8B0000".to_string(),
                "#000000".to_string(),
            ],
            node_border_color: "white".to_string(),
            text_color: "white".to_string(),
            insertion_color: "#00FFAA".to_string(),
            deletion_color: "#FF5555".to_string(),
        }
    }

    pub fn paper() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background_top: "#FFFFFF".to_string(),
            background_bottom: "#EEF2F8".to_string(),
            galaxy_stops: [
                "#DCE6FA".to_string(),
                "#E9DDF5".to_string(),
                "#FFFFFF".to_string(),
            ],
            galaxy_rings: [
                "#C7D2E5".to_string(),
                "#D7C8EE".to_string(),
                "#C4E4F5".to_string(),
            ],
            star_color: "#7A8AA6".to_string(),
            edge_color: "#7A8AA6".to_string(),
            flow_color: "#1C2430".to_string(),
            node_main_color: "#2F4A8A".to_string(),
            node_branch_color: "#6B4A96".to_string(),
            node_tip_color: "#9370DB".to_string(),
            merge_colors: [
                "#2E7D32".to_string(),
                "#E07A50".to_string(),
                "#8B0000".to_string(),
                "#1C2430".to_string(),
            ],
            node_border_color: "#1C2430".to_string(),
            text_color: "#FFFFFF".to_string(),
            insertion_color: "#7CF5C4".to_string(),
            deletion_color: "#FF9C9C".to_string(),
        }
    }

    /// Fill for a commit node from its parent and child counts.
    pub fn node_fill(&self, fan_in: usize, fan_out: usize, on_default_branch: bool) -> &str {
        match fan_in {
            n if n >= 5 => &self.merge_colors[3],
            4 => &self.merge_colors[2],
            3 => &self.merge_colors[1],
            2 => &self.merge_colors[0],
            _ if fan_out == 0 => &self.node_tip_color,
            _ if on_default_branch => &self.node_main_color,
            _ => &self.node_branch_color,
        }
    }
}

/// Converts HSV components in `0.0..=1.0` to 8-bit RGB.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    if s <= 0.0 {
        let c = (v * 255.0) as u8;
        return (c, c, c);
    }
    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    ((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

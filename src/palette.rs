use crate::theme::hsv_to_rgb;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

const BRANCH_SATURATION: f32 = 0.85;
const BRANCH_VALUE: f32 = 0.95;

/// Per-run branch colors: a random hue is drawn the first time a branch is
/// seen and reused afterwards.
pub struct BranchPalette {
    rng: StdRng,
    colors: HashMap<String, String>,
}

impl BranchPalette {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            colors: HashMap::new(),
        }
    }

    pub fn color_for(&mut self, branch: &str) -> &str {
        if !self.colors.contains_key(branch) {
            let hue: f32 = self.rng.gen_range(0.0..1.0);
            let (r, g, b) = hsv_to_rgb(hue, BRANCH_SATURATION, BRANCH_VALUE);
            self.colors
                .insert(branch.to_string(), format!("rgb({r},{g},{b})"));
        }
        &self.colors[branch]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_are_cached_per_branch() {
        let mut palette = BranchPalette::new(Some(1));
        let main = palette.color_for("main").to_string();
        let topic = palette.color_for("topic").to_string();
        assert_eq!(palette.color_for("main"), main);
        assert_eq!(palette.color_for("topic"), topic);
        assert_eq!(palette.len(), 2);
        assert!(main.starts_with("rgb("));
    }

    #[test]
    fn seeded_palettes_agree() {
        let mut a = BranchPalette::new(Some(42));
        let mut b = BranchPalette::new(Some(42));
        for name in ["main", "dev", "feature/x"] {
            assert_eq!(a.color_for(name), b.color_for(name));
        }
    }
}

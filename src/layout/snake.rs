use crate::config::LayoutConfig;

use super::NodeLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeDirection {
    Rightward,
    Leftward,
}

/// Walks the boustrophedon path: left to right along a row, drop one row,
/// right to left, drop again.
#[derive(Debug, Clone)]
pub struct SnakeCursor {
    pub x: f32,
    pub y: f32,
    pub direction: SnakeDirection,
    left: f32,
    right: f32,
    column_pitch: f32,
    row_pitch: f32,
}

impl SnakeCursor {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            x: config.left,
            y: config.top,
            direction: SnakeDirection::Rightward,
            left: config.left,
            right: config.right(),
            column_pitch: config.column_pitch(),
            row_pitch: config.row_pitch(),
        }
    }

    /// Moves one node pitch along the current row. Crossing a bound clamps
    /// to it, flips direction and drops a row; landing exactly on the bound
    /// does not.
    pub fn advance(&mut self) {
        match self.direction {
            SnakeDirection::Rightward => {
                self.x += self.column_pitch;
                if self.x > self.right {
                    self.direction = SnakeDirection::Leftward;
                    self.y += self.row_pitch;
                    self.x = self.right;
                }
            }
            SnakeDirection::Leftward => {
                self.x -= self.column_pitch;
                if self.x < self.left {
                    self.direction = SnakeDirection::Rightward;
                    self.y += self.row_pitch;
                    self.x = self.left;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SnakePlacement {
    pub nodes: Vec<NodeLayout>,
    pub max_x: f32,
    pub max_y: f32,
}

pub fn place_snake<'a, I>(ids: I, config: &LayoutConfig) -> SnakePlacement
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: ExactSizeIterator,
{
    let ids = ids.into_iter();
    let total = ids.len();
    let log_step = (total / 10).max(10);
    let mut cursor = SnakeCursor::new(config);
    let mut nodes = Vec::with_capacity(total);
    let mut max_x = config.left;
    let mut max_y = config.top;

    for (index, id) in ids.enumerate() {
        if (index + 1) % log_step == 0 || index + 1 == total {
            log::debug!("layout progress: {}/{}", index + 1, total);
        }
        // Place first, then advance: a node is recorded even if the wrap
        // band is narrower than the node itself.
        nodes.push(NodeLayout {
            id: id.to_string(),
            x: cursor.x,
            y: cursor.y,
            width: config.node_width,
            height: config.node_height,
        });
        max_x = max_x.max(cursor.x + config.node_width);
        max_y = max_y.max(cursor.y + config.node_height);
        cursor.advance();
    }

    SnakePlacement {
        nodes,
        max_x,
        max_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("c{i}")).collect()
    }

    fn place(count: usize, config: &LayoutConfig) -> SnakePlacement {
        let ids = ids(count);
        place_snake(ids.iter().map(String::as_str), config)
    }

    fn xy(placement: &SnakePlacement) -> Vec<(f32, f32)> {
        placement.nodes.iter().map(|n| (n.x, n.y)).collect()
    }

    #[test]
    fn default_band_wraps_after_four_columns() {
        let placement = place(9, &LayoutConfig::default());
        assert_eq!(
            xy(&placement),
            vec![
                (100.0, 100.0),
                (550.0, 100.0),
                (1000.0, 100.0),
                (1450.0, 100.0),
                (1600.0, 230.0),
                (1150.0, 230.0),
                (700.0, 230.0),
                (250.0, 230.0),
                (100.0, 360.0),
            ]
        );
        assert_eq!(placement.max_x, 1950.0);
        assert_eq!(placement.max_y, 440.0);
    }

    #[test]
    fn single_commit_sits_at_origin() {
        let placement = place(1, &LayoutConfig::default());
        assert_eq!(xy(&placement), vec![(100.0, 100.0)]);
        assert_eq!(placement.max_x, 450.0);
        assert_eq!(placement.max_y, 180.0);
    }

    #[test]
    fn empty_input_keeps_origin_bounds() {
        let placement = place(0, &LayoutConfig::default());
        assert!(placement.nodes.is_empty());
        assert_eq!(placement.max_x, 100.0);
        assert_eq!(placement.max_y, 100.0);
    }

    #[test]
    fn landing_on_the_bound_does_not_double_advance() {
        let config = LayoutConfig {
            node_width: 100.0,
            node_height: 50.0,
            h_margin: 0.0,
            v_margin: 0.0,
            left: 0.0,
            top: 0.0,
            wrap_width: 200.0,
            ..LayoutConfig::default()
        };
        let placement = place(7, &config);
        assert_eq!(
            xy(&placement),
            vec![
                (0.0, 0.0),
                (100.0, 0.0),
                (200.0, 0.0),
                (200.0, 50.0),
                (100.0, 50.0),
                (0.0, 50.0),
                (0.0, 100.0),
            ]
        );
    }

    #[test]
    fn wrap_narrower_than_a_node_still_places_everything() {
        let config = LayoutConfig {
            wrap_width: 5.0,
            ..LayoutConfig::default()
        };
        let placement = place(4, &config);
        assert_eq!(
            xy(&placement),
            vec![
                (100.0, 100.0),
                (105.0, 230.0),
                (100.0, 360.0),
                (105.0, 490.0),
            ]
        );
    }

    #[test]
    fn consecutive_steps_follow_the_snake() {
        let config = LayoutConfig::default();
        let placement = place(40, &config);
        let mut direction = 1.0f32;
        for pair in placement.nodes.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.y == b.y {
                assert_eq!(b.x, a.x + direction * config.column_pitch());
            } else {
                assert_eq!(b.y, a.y + config.row_pitch());
                let bound = if direction > 0.0 {
                    config.right()
                } else {
                    config.left
                };
                assert_eq!(b.x, bound);
                direction = -direction;
            }
        }
    }

    #[test]
    fn no_two_nodes_overlap() {
        let placement = place(60, &LayoutConfig::default());
        for (i, a) in placement.nodes.iter().enumerate() {
            for b in &placement.nodes[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a.id, b.id);
            }
        }
    }
}

mod routing;
mod snake;
pub(crate) mod types;
pub use routing::{classify, rect_exit_point, route_connectors, route_pair};
pub use snake::{SnakeCursor, SnakeDirection, SnakePlacement, place_snake};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::History;
use std::collections::HashMap;

/// Places every commit on the snake path, then routes every parent→child
/// pair against the finished position map.
pub fn compute_layout(history: &History, config: &LayoutConfig) -> Layout {
    log::info!("laying out {} commits", history.len());
    let placement = place_snake(
        history.commits.iter().map(|commit| commit.id.as_str()),
        config,
    );

    let index: HashMap<String, usize> = placement
        .nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.clone(), idx))
        .collect();

    let mut layout = Layout {
        nodes: placement.nodes,
        connectors: Vec::new(),
        max_x: placement.max_x,
        max_y: placement.max_y,
        width: placement.max_x + config.canvas_padding,
        height: placement.max_y + config.canvas_padding,
        index,
    };

    layout.connectors = route_connectors(history, &layout, config);
    log::info!(
        "routed {} connectors on a {}x{} canvas",
        layout.connectors.len(),
        layout.width,
        layout.height
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Commit;

    #[test]
    fn empty_history_yields_empty_layout() {
        let layout = compute_layout(&History::default(), &LayoutConfig::default());
        assert!(layout.is_empty());
        assert!(layout.connectors.is_empty());
        assert_eq!(layout.width, 600.0);
        assert_eq!(layout.height, 600.0);
    }

    #[test]
    fn canvas_adds_padding_to_content_bounds() {
        let history = History::from_commits(vec![
            Commit::new("a", 1, &[]),
            Commit::new("b", 2, &["a"]),
        ]);
        let layout = compute_layout(&history, &LayoutConfig::default());
        assert_eq!(layout.max_x, 900.0);
        assert_eq!(layout.max_y, 180.0);
        assert_eq!(layout.width, 1400.0);
        assert_eq!(layout.height, 680.0);
        assert_eq!(layout.position("b"), Some((550.0, 100.0)));
        assert_eq!(layout.position("missing"), None);
    }

    #[test]
    fn positions_follow_timestamps_not_input_order() {
        let history = History::from_commits(vec![
            Commit::new("late", 50, &["early"]),
            Commit::new("early", 10, &[]),
        ]);
        let layout = compute_layout(&history, &LayoutConfig::default());
        assert_eq!(layout.position("early"), Some((100.0, 100.0)));
        assert_eq!(layout.position("late"), Some((550.0, 100.0)));
    }

    #[test]
    fn every_commit_gets_exactly_one_node() {
        let commits: Vec<Commit> = (0..25)
            .map(|i| Commit::new(&format!("c{i}"), i, &[]))
            .collect();
        let history = History::from_commits(commits);
        let layout = compute_layout(&history, &LayoutConfig::default());
        assert_eq!(layout.nodes.len(), 25);
        for commit in &history.commits {
            assert_eq!(layout.node(&commit.id).map(|n| n.id.as_str()), Some(commit.id.as_str()));
        }
    }
}

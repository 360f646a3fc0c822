use crate::config::LayoutConfig;
use crate::ir::History;

use super::{Connector, ConnectorPath, Layout, NodeLayout, Point, RouteKind, TurnSide};

/// Picks the routing case for a parent→child pair. Same row wins over
/// vertical alignment when both hold.
pub fn classify(parent: &NodeLayout, child: &NodeLayout, config: &LayoutConfig) -> RouteKind {
    let tolerance = config.align_tolerance;
    if (child.y - parent.y).abs() < tolerance {
        RouteKind::SameRow
    } else if (child.x - parent.x).abs() < tolerance {
        RouteKind::Turn(turn_side(parent, config))
    } else {
        RouteKind::Cross
    }
}

fn turn_side(parent: &NodeLayout, config: &LayoutConfig) -> TurnSide {
    let (center_x, _) = parent.center();
    if center_x > config.turn_threshold() {
        TurnSide::Right
    } else {
        TurnSide::Left
    }
}

pub fn route_pair(parent: &NodeLayout, child: &NodeLayout, config: &LayoutConfig) -> Connector {
    let kind = classify(parent, child, config);
    let parent_center = parent.center();
    let child_center = child.center();
    let path = match kind {
        RouteKind::SameRow => {
            // Starts at the parent's center: the parent rect is drawn on top
            // and hides the first half of the line.
            let to_x = if child.x > parent.x {
                child.x
            } else {
                child.x + child.width
            };
            ConnectorPath::Line {
                from: parent_center,
                to: (to_x, child_center.1),
            }
        }
        RouteKind::Turn(side) => {
            let (parent_edge, child_edge, bow) = match side {
                TurnSide::Right => (
                    parent.x + parent.width,
                    child.x + child.width,
                    config.curve_margin,
                ),
                TurnSide::Left => (parent.x, child.x, -config.curve_margin),
            };
            ConnectorPath::Curve {
                from: (parent_edge, parent_center.1),
                ctrl1: (parent_edge + bow, parent_center.1),
                ctrl2: (child_edge + bow, child_center.1),
                to: (child_edge, child_center.1),
            }
        }
        RouteKind::Cross => ConnectorPath::Line {
            from: parent_center,
            to: rect_exit_point(child_center, parent_center, child.width, child.height),
        },
    };
    Connector {
        parent: parent.id.clone(),
        child: child.id.clone(),
        kind,
        path,
        directed: true,
    }
}

/// Point where the ray from `center` toward `toward` leaves the axis-aligned
/// `width` x `height` rectangle centered on `center`.
pub fn rect_exit_point(center: Point, toward: Point, width: f32, height: f32) -> Point {
    let dx = toward.0 - center.0;
    let dy = toward.1 - center.1;
    if dx == 0.0 && dy == 0.0 {
        return center;
    }
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let mut t = f32::INFINITY;
    if dx != 0.0 {
        t = t.min(half_w / dx.abs());
    }
    if dy != 0.0 {
        t = t.min(half_h / dy.abs());
    }
    (center.0 + dx * t, center.1 + dy * t)
}

/// One connector per (commit, parent) pair, in commit order then parent
/// order. Parents outside the layout and self-references are skipped.
pub fn route_connectors(history: &History, layout: &Layout, config: &LayoutConfig) -> Vec<Connector> {
    let total = history.len();
    let log_step = (total / 10).max(10);
    let mut connectors = Vec::new();
    for (index, commit) in history.commits.iter().enumerate() {
        if (index + 1) % log_step == 0 || index + 1 == total {
            log::debug!("routing progress: {}/{}", index + 1, total);
        }
        let Some(child) = layout.node(&commit.id) else {
            continue;
        };
        for parent_id in history.adjacency.parents(&commit.id) {
            if parent_id == &commit.id {
                continue;
            }
            let Some(parent) = layout.node(parent_id) else {
                log::trace!("skipping edge {} -> {}: parent not loaded", parent_id, commit.id);
                continue;
            };
            connectors.push(route_pair(parent, child, config));
        }
    }
    connectors
}

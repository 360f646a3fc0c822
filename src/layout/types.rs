use std::collections::HashMap;

use serde::Serialize;

pub type Point = (f32, f32);

#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeLayout {
    pub fn center(&self) -> Point {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn overlaps(&self, other: &NodeLayout) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnSide {
    Left,
    Right,
}

/// How a parent→child pair is drawn, decided from their relative position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    SameRow,
    Turn(TurnSide),
    Cross,
}

impl RouteKind {
    pub fn name(&self) -> &'static str {
        match self {
            RouteKind::SameRow => "same-row",
            RouteKind::Turn(_) => "turn",
            RouteKind::Cross => "cross",
        }
    }

    pub fn side(&self) -> Option<TurnSide> {
        match self {
            RouteKind::Turn(side) => Some(*side),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorPath {
    Line {
        from: Point,
        to: Point,
    },
    Curve {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
}

impl ConnectorPath {
    pub fn start(&self) -> Point {
        match self {
            ConnectorPath::Line { from, .. } | ConnectorPath::Curve { from, .. } => *from,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            ConnectorPath::Line { to, .. } | ConnectorPath::Curve { to, .. } => *to,
        }
    }

    /// All defining points in drawing order (controls included for curves).
    pub fn points(&self) -> Vec<Point> {
        match self {
            ConnectorPath::Line { from, to } => vec![*from, *to],
            ConnectorPath::Curve {
                from,
                ctrl1,
                ctrl2,
                to,
            } => vec![*from, *ctrl1, *ctrl2, *to],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub parent: String,
    pub child: String,
    pub kind: RouteKind,
    pub path: ConnectorPath,
    /// Arrowhead sits at the child end.
    pub directed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Nodes in ascending timestamp order.
    pub nodes: Vec<NodeLayout>,
    pub connectors: Vec<Connector>,
    /// Right edge of the rightmost node.
    pub max_x: f32,
    /// Bottom edge of the lowest node.
    pub max_y: f32,
    pub width: f32,
    pub height: f32,
    pub(crate) index: HashMap<String, usize>,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.node(id).map(|node| (node.x, node.y))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

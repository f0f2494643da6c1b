use serde::{Deserialize, Serialize};

pub type NodeId = String;
pub type RoomName = String;
pub type ItemId = String;

/// Reported when a node is not owned by any room.
pub const UNKNOWN_ROOM: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

impl Position2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Position2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl RoomBounds {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    pub fn contains(&self, point: Position2D, margin: f64) -> bool {
        point.x >= self.min_x - margin
            && point.x <= self.max_x + margin
            && point.y >= self.min_y - margin
            && point.y <= self.max_y + margin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub room: RoomName,
    pub position: Position2D,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub name: RoomName,
    pub bounds: Option<RoomBounds>,
    /// Node ids in registration order.
    pub nodes: Vec<NodeId>,
}

impl Room {
    pub fn new(name: impl Into<RoomName>, bounds: Option<RoomBounds>) -> Self {
        Self {
            name: name.into(),
            bounds,
            nodes: Vec::new(),
        }
    }

    /// Rectangular membership test. Rooms without bounds contain nothing.
    pub fn contains(&self, point: Position2D, margin: f64) -> bool {
        self.bounds
            .map(|b| b.contains(point, margin))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    pub weight: u32,
}

use super::graph::GraphStore;
use super::types::{ItemId, NodeId, Position2D, RoomBounds, RoomName};
use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "COURIER_DATA_DIR";

/// Resolve the floor plan directory.
/// Precedence: COURIER_DATA_DIR env var -> ./resources/floor_plans -> /usr/share/courier-sim/floor_plans
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(v) = env::var(DATA_DIR_ENV) {
        return PathBuf::from(v);
    }
    let cwd_default = Path::new("resources/floor_plans");
    if cwd_default.exists() {
        return cwd_default.to_path_buf();
    }
    PathBuf::from("/usr/share/courier-sim/floor_plans")
}

/// Declarative description of one episode's world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloorPlan {
    pub robot_start: NodeId,
    #[serde(default)]
    pub user_node: Option<NodeId>,
    /// Impassable nodes. The robot only learns about them by bumping into them.
    #[serde(default)]
    pub obstacles: Vec<NodeId>,
    /// Doorways and any other edge declared outside a room.
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    #[serde(default)]
    pub items: BTreeMap<ItemId, NodeId>,
    #[serde(default)]
    pub rooms: Vec<RoomSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSpec {
    pub name: RoomName,
    /// `[x1, y1, x2, y2]`
    #[serde(default)]
    pub bounds: Option<[f64; 4]>,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: NodeId,
    pub at: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeSpec {
    Weighted(NodeId, NodeId, u32),
    Unit(NodeId, NodeId),
}

impl EdgeSpec {
    pub fn parts(&self) -> (&str, &str, u32) {
        match self {
            EdgeSpec::Weighted(a, b, w) => (a, b, *w),
            EdgeSpec::Unit(a, b) => (a, b, 1),
        }
    }
}

impl FloorPlan {
    pub fn from_toml_str(source: &str) -> DomainResult<Self> {
        toml::from_str(source).map_err(|e| DomainError::InvalidCommand {
            reason: format!("Malformed floor plan: {}", e),
        })
    }

    pub fn from_json_str(source: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Register rooms, nodes and edges in declaration order. Room-local edges
    /// come before the top-level ones.
    pub fn build_graph(&self) -> DomainResult<GraphStore> {
        let mut graph = GraphStore::new();
        for room in &self.rooms {
            let bounds = room.bounds.map(|[x1, y1, x2, y2]| RoomBounds::new(x1, y1, x2, y2));
            graph.add_room(&room.name, bounds);
            for node in &room.nodes {
                let [x, y] = node.at;
                graph.add_node(&room.name, &node.id, Position2D::new(x, y))?;
            }
        }
        for edge in self.rooms.iter().flat_map(|r| r.edges.iter()).chain(self.edges.iter()) {
            let (a, b, weight) = edge.parts();
            graph.add_edge(a, b, weight)?;
        }
        self.check_references(&graph)?;
        Ok(graph)
    }

    fn check_references(&self, graph: &GraphStore) -> DomainResult<()> {
        let referenced = std::iter::once(&self.robot_start)
            .chain(self.user_node.iter())
            .chain(self.obstacles.iter())
            .chain(self.items.values());
        for id in referenced {
            if !graph.contains(id) {
                return Err(DomainError::UnknownNode { id: id.clone() });
            }
        }
        Ok(())
    }
}

use super::types::{Edge, Node, NodeId, Position2D, Room, RoomBounds};
use crate::common::{DomainError, DomainResult};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap};

/// Static topology of the floor plan: rooms, their nodes and the symmetric
/// unit-weight adjacency between nodes.
///
/// Node ids are unique across the whole graph, not just within a room.
/// Neighbours are always reported in the order their edges were declared,
/// which makes breadth-first tie-breaking reproducible.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    graph: UnGraph<Node, u32>,
    index: HashMap<NodeId, NodeIndex>,
    rooms: Vec<Room>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a room, or set the bounds of one created implicitly by `add_node`.
    pub fn add_room(&mut self, name: &str, bounds: Option<RoomBounds>) {
        match self.rooms.iter_mut().find(|r| r.name == name) {
            Some(room) => {
                if bounds.is_some() {
                    room.bounds = bounds;
                }
            }
            None => self.rooms.push(Room::new(name, bounds)),
        }
    }

    pub fn add_node(&mut self, room: &str, id: &str, position: Position2D) -> DomainResult<()> {
        if let Some(existing) = self.index.get(id) {
            return Err(DomainError::DuplicateNode {
                id: id.to_string(),
                room: self.graph[*existing].room.clone(),
            });
        }
        self.add_room(room, None);
        let ix = self.graph.add_node(Node {
            id: id.to_string(),
            room: room.to_string(),
            position,
        });
        self.index.insert(id.to_string(), ix);
        if let Some(r) = self.rooms.iter_mut().find(|r| r.name == room) {
            r.nodes.push(id.to_string());
        }
        Ok(())
    }

    /// Connect two registered nodes. Re-declaring an existing edge only
    /// updates its weight and keeps its original position in the adjacency order.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: u32) -> DomainResult<()> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        if ia == ib {
            return Err(DomainError::InvalidCommand {
                reason: format!("Edge from {} to itself", a),
            });
        }
        self.graph.update_edge(ia, ib, weight);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> DomainResult<&Node> {
        let ix = self.index_of(id)?;
        Ok(&self.graph[ix])
    }

    pub fn coordinates_of(&self, id: &str) -> DomainResult<Position2D> {
        Ok(self.node(id)?.position)
    }

    pub fn all_node_ids(&self) -> BTreeSet<NodeId> {
        self.index.keys().cloned().collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, name: &str) -> DomainResult<&Room> {
        self.rooms
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| DomainError::RoomNotFound {
                room: name.to_string(),
            })
    }

    pub fn nodes_of(&self, room: &str) -> DomainResult<&[NodeId]> {
        Ok(&self.room(room)?.nodes)
    }

    pub fn room_of(&self, id: &str) -> Option<&str> {
        self.index
            .get(id)
            .map(|ix| self.graph[*ix].room.as_str())
    }

    /// Rooms whose bounds contain the point.
    pub fn rooms_at(&self, point: Position2D, margin: f64) -> Vec<&Room> {
        self.rooms
            .iter()
            .filter(|r| r.contains(point, margin))
            .collect()
    }

    /// Edges with both endpoints inside `room`, in declaration order.
    pub fn edges_within_room(&self, room: &str) -> DomainResult<Vec<Edge>> {
        let room = self.room(room)?;
        Ok(self
            .edges()
            .into_iter()
            .filter(|e| room.nodes.contains(&e.a) && room.nodes.contains(&e.b))
            .collect())
    }

    /// Every edge once, in declaration order.
    pub fn edges(&self) -> Vec<Edge> {
        self.graph
            .edge_references()
            .map(|e| Edge {
                a: self.graph[e.source()].id.clone(),
                b: self.graph[e.target()].id.clone(),
                weight: *e.weight(),
            })
            .collect()
    }

    pub fn neighbors(&self, id: &str) -> DomainResult<Vec<&str>> {
        let ix = self.index_of(id)?;
        Ok(self
            .neighbor_indices(ix)
            .into_iter()
            .map(|n| self.graph[n].id.as_str())
            .collect())
    }

    pub fn are_adjacent(&self, a: &str, b: &str) -> bool {
        self.weight_between(a, b).is_some()
    }

    pub fn weight_between(&self, a: &str, b: &str) -> Option<u32> {
        let ia = *self.index.get(a)?;
        let ib = *self.index.get(b)?;
        self.graph
            .find_edge(ia, ib)
            .and_then(|e| self.graph.edge_weight(e).copied())
    }

    pub(crate) fn index_of(&self, id: &str) -> DomainResult<NodeIndex> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| DomainError::UnknownNode { id: id.to_string() })
    }

    pub(crate) fn id_of(&self, ix: NodeIndex) -> &str {
        &self.graph[ix].id
    }

    // petgraph walks adjacency newest-first; edge indices preserve declaration order.
    pub(crate) fn neighbor_indices(&self, ix: NodeIndex) -> Vec<NodeIndex> {
        let mut adjacent: Vec<_> = self
            .graph
            .edges(ix)
            .map(|e| {
                let other = if e.source() == ix { e.target() } else { e.source() };
                (e.id().index(), other)
            })
            .collect();
        adjacent.sort_by_key(|(edge, _)| *edge);
        adjacent.into_iter().map(|(_, n)| n).collect()
    }
}

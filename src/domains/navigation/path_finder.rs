use super::graph::GraphStore;
use super::types::NodeId;
use crate::common::{DomainError, DomainResult};
use petgraph::graph::NodeIndex;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Unweighted breadth-first search over the live graph.
///
/// Results are never cached: every call reads the graph as it is now.
pub struct PathFinder<'a> {
    graph: &'a GraphStore,
}

impl<'a> PathFinder<'a> {
    pub fn new(graph: &'a GraphStore) -> Self {
        Self { graph }
    }

    /// Fewest-hop path from `start` to `end`, both inclusive.
    ///
    /// `[start]` when they are equal, empty when `end` is unreachable.
    pub fn shortest_path(&self, start: &str, end: &str) -> DomainResult<Vec<NodeId>> {
        let from = self.graph.index_of(start)?;
        let to = self.graph.index_of(end)?;
        Ok(self.search(from, to, |_| true).unwrap_or_default())
    }

    /// Like [`shortest_path`](Self::shortest_path), but no node in `blocked`
    /// is ever entered. A blocked start does not prevent leaving it.
    ///
    /// `None` means every route is cut off, which includes a blocked goal.
    pub fn shortest_path_avoiding(
        &self,
        start: &str,
        end: &str,
        blocked: &BTreeSet<NodeId>,
    ) -> DomainResult<Option<Vec<NodeId>>> {
        let from = self.graph.index_of(start)?;
        let to = self.graph.index_of(end)?;
        Ok(self.search(from, to, |ix| !blocked.contains(self.graph.id_of(ix))))
    }

    /// Hop count of the shortest path. Fails with `NoPathFound` when `end`
    /// cannot be reached.
    pub fn distance(&self, start: &str, end: &str) -> DomainResult<usize> {
        let path = self.shortest_path(start, end)?;
        if path.is_empty() {
            return Err(DomainError::NoPathFound {
                start: start.to_string(),
                target: end.to_string(),
            });
        }
        Ok(path.len() - 1)
    }

    fn search<F>(&self, from: NodeIndex, to: NodeIndex, passable: F) -> Option<Vec<NodeId>>
    where
        F: Fn(NodeIndex) -> bool,
    {
        if from == to {
            return Some(vec![self.graph.id_of(from).to_string()]);
        }

        let mut visited = HashSet::from([from]);
        let mut came_from: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            for next in self.graph.neighbor_indices(current) {
                if visited.contains(&next) || !passable(next) {
                    continue;
                }
                visited.insert(next);
                came_from.insert(next, current);
                if next == to {
                    return Some(self.unwind(&came_from, from, to));
                }
                queue.push_back(next);
            }
        }
        None
    }

    fn unwind(
        &self,
        came_from: &HashMap<NodeIndex, NodeIndex>,
        from: NodeIndex,
        to: NodeIndex,
    ) -> Vec<NodeId> {
        let mut path = vec![self.graph.id_of(to).to_string()];
        let mut cursor = to;
        while cursor != from {
            match came_from.get(&cursor) {
                Some(prev) => {
                    cursor = *prev;
                    path.push(self.graph.id_of(cursor).to_string());
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

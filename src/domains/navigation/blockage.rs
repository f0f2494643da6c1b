use super::types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Nodes known to be impassable for the rest of the episode.
///
/// Only grows. A new episode starts with a new ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockageLedger {
    blocked: BTreeSet<NodeId>,
}

impl BlockageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_blocked(&self, id: &str) -> bool {
        self.blocked.contains(id)
    }

    /// Returns `true` when the node was not known before.
    pub fn mark_blocked(&mut self, id: &str) -> bool {
        self.blocked.insert(id.to_string())
    }

    pub fn all(&self) -> BTreeSet<NodeId> {
        self.blocked.clone()
    }

    pub fn as_set(&self) -> &BTreeSet<NodeId> {
        &self.blocked
    }

    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }
}

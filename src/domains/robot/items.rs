use crate::domains::navigation::{ItemId, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where each item lies on the floor plan.
///
/// An item carried by the robot is absent from the registry; the robot is the
/// single owner of the "who holds it" fact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemRegistry {
    locations: BTreeMap<ItemId, NodeId>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location_of(&self, item: &str) -> Option<&NodeId> {
        self.locations.get(item)
    }

    pub fn set_location(&mut self, item: &str, node: &str) {
        self.locations.insert(item.to_string(), node.to_string());
    }

    pub fn remove(&mut self, item: &str) -> Option<NodeId> {
        self.locations.remove(item)
    }

    pub fn all(&self) -> BTreeMap<ItemId, NodeId> {
        self.locations.clone()
    }

    pub fn items_at(&self, node: &str) -> Vec<&ItemId> {
        self.locations
            .iter()
            .filter(|(_, at)| at.as_str() == node)
            .map(|(item, _)| item)
            .collect()
    }
}

impl FromIterator<(ItemId, NodeId)> for ItemRegistry {
    fn from_iter<I: IntoIterator<Item = (ItemId, NodeId)>>(iter: I) -> Self {
        Self {
            locations: iter.into_iter().collect(),
        }
    }
}

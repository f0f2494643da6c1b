use super::events::RobotEvent;
use crate::domains::navigation::{ItemId, NodeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read model of one robot's episode, folded from its events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotTrackingProjection {
    pub robot_id: String,
    pub current_node: NodeId,
    pub trajectory: Vec<NodeId>,
    pub discovered_blockages: Vec<NodeId>,
    pub blocked_attempts: usize,
    pub deliveries: Vec<Delivery>,
    pub held_item: Option<ItemId>,
    picked_up_at: Option<NodeId>,
    pub last_activity: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub item_id: ItemId,
    pub picked_up_at: Option<NodeId>,
    pub dropped_off_at: NodeId,
}

impl RobotTrackingProjection {
    pub fn new(robot_id: String, start_node: NodeId, created_at: DateTime<Utc>) -> Self {
        Self {
            robot_id,
            current_node: start_node.clone(),
            trajectory: vec![start_node],
            discovered_blockages: Vec::new(),
            blocked_attempts: 0,
            deliveries: Vec::new(),
            held_item: None,
            picked_up_at: None,
            last_activity: created_at,
        }
    }

    pub fn steps_taken(&self) -> usize {
        self.trajectory.len().saturating_sub(1)
    }

    pub fn apply_event(&mut self, event: &RobotEvent) {
        match event {
            RobotEvent::Moved { to, timestamp, .. } => {
                self.current_node = to.clone();
                self.trajectory.push(to.clone());
                self.last_activity = *timestamp;
            }
            RobotEvent::MoveBlocked {
                node,
                newly_discovered,
                timestamp,
                ..
            } => {
                self.blocked_attempts += 1;
                if *newly_discovered {
                    self.discovered_blockages.push(node.clone());
                }
                self.last_activity = *timestamp;
            }
            RobotEvent::ItemPickedUp {
                item_id,
                node,
                timestamp,
                ..
            } => {
                self.held_item = Some(item_id.clone());
                self.picked_up_at = Some(node.clone());
                self.last_activity = *timestamp;
            }
            RobotEvent::ItemDroppedOff {
                item_id,
                node,
                timestamp,
                ..
            } => {
                self.deliveries.push(Delivery {
                    item_id: item_id.clone(),
                    picked_up_at: self.picked_up_at.take(),
                    dropped_off_at: node.clone(),
                });
                self.held_item = None;
                self.last_activity = *timestamp;
            }
            RobotEvent::PathCommitted { timestamp, .. } => {
                self.last_activity = *timestamp;
            }
            RobotEvent::RobotCreated { .. } => {}
        }
    }
}

use crate::common::DomainEvent;
use crate::domains::navigation::{ItemId, NodeId, Position2D};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RobotEvent {
    RobotCreated {
        robot_id: String,
        start_node: NodeId,
        position: Position2D,
        timestamp: DateTime<Utc>,
    },
    PathCommitted {
        robot_id: String,
        path: Vec<NodeId>,
        timestamp: DateTime<Utc>,
    },
    Moved {
        robot_id: String,
        from: NodeId,
        to: NodeId,
        position: Position2D,
        timestamp: DateTime<Utc>,
    },
    MoveBlocked {
        robot_id: String,
        node: NodeId,
        /// `false` when the node was already in the ledger.
        newly_discovered: bool,
        timestamp: DateTime<Utc>,
    },
    ItemPickedUp {
        robot_id: String,
        item_id: ItemId,
        node: NodeId,
        timestamp: DateTime<Utc>,
    },
    ItemDroppedOff {
        robot_id: String,
        item_id: ItemId,
        node: NodeId,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for RobotEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RobotEvent::RobotCreated { .. } => "RobotCreated",
            RobotEvent::PathCommitted { .. } => "PathCommitted",
            RobotEvent::Moved { .. } => "Moved",
            RobotEvent::MoveBlocked { .. } => "MoveBlocked",
            RobotEvent::ItemPickedUp { .. } => "ItemPickedUp",
            RobotEvent::ItemDroppedOff { .. } => "ItemDroppedOff",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            RobotEvent::RobotCreated { robot_id, .. }
            | RobotEvent::PathCommitted { robot_id, .. }
            | RobotEvent::Moved { robot_id, .. }
            | RobotEvent::MoveBlocked { robot_id, .. }
            | RobotEvent::ItemPickedUp { robot_id, .. }
            | RobotEvent::ItemDroppedOff { robot_id, .. } => robot_id,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RobotEvent::RobotCreated { timestamp, .. }
            | RobotEvent::PathCommitted { timestamp, .. }
            | RobotEvent::Moved { timestamp, .. }
            | RobotEvent::MoveBlocked { timestamp, .. }
            | RobotEvent::ItemPickedUp { timestamp, .. }
            | RobotEvent::ItemDroppedOff { timestamp, .. } => *timestamp,
        }
    }

    fn describe(&self) -> String {
        match self {
            RobotEvent::RobotCreated { start_node, .. } => format!("Robot placed at {}", start_node),
            RobotEvent::PathCommitted { path, .. } if path.is_empty() => "Path cleared".to_string(),
            RobotEvent::PathCommitted { path, .. } => format!("Path committed: {}", path.join(" -> ")),
            RobotEvent::Moved { to, .. } => format!("Moved to node {}", to),
            RobotEvent::MoveBlocked { node, newly_discovered: true, .. } => format!("Node {} blocked", node),
            RobotEvent::MoveBlocked { node, .. } => format!("Node {} previously blocked", node),
            RobotEvent::ItemPickedUp { item_id, node, .. } => format!("Picked up item {} at {}", item_id, node),
            RobotEvent::ItemDroppedOff { item_id, node, .. } => format!("Dropped off item {} at {}", item_id, node),
        }
    }
}

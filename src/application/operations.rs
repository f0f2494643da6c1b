use super::environment::{EpisodeSnapshot, ItemLocation, NavigationOutcome, RoomInfo};
use crate::common::{DomainError, DomainResult};
use crate::domains::navigation::{ItemId, NodeId, Position2D, RoomName};
use crate::domains::robot::StepOutcome;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The fixed vocabulary a planner may call, one method per operation.
#[async_trait]
pub trait RobotOperations: Send + Sync {
    async fn plan_path(&self, start: &str, target: &str) -> DomainResult<Vec<NodeId>>;
    async fn plan_path_avoiding(
        &self,
        target: &str,
        blocked: &BTreeSet<NodeId>,
    ) -> DomainResult<Option<Vec<NodeId>>>;
    async fn advance(&self, next: &str) -> DomainResult<StepOutcome>;
    async fn navigate_to(&self, target: &str) -> DomainResult<NavigationOutcome>;
    async fn mark_blocked(&self, node: &str) -> DomainResult<bool>;
    async fn current_position(&self) -> (NodeId, Position2D);
    async fn current_room(&self) -> RoomName;
    async fn pick_up(&self, item: &str) -> DomainResult<()>;
    async fn drop_off(&self, item: &str, node: &str) -> DomainResult<()>;
    async fn location_of(&self, item: &str) -> DomainResult<ItemLocation>;
    async fn all_items(&self) -> BTreeMap<ItemId, NodeId>;
    async fn nodes_in_room(&self, room: &str) -> DomainResult<Vec<NodeId>>;
    async fn room_info(&self, room: &str) -> DomainResult<RoomInfo>;
    async fn user_location(&self) -> DomainResult<NodeId>;
    async fn blocked_nodes(&self) -> BTreeSet<NodeId>;
    async fn snapshot(&self) -> EpisodeSnapshot;
}

/// Wire form of a call: `{"name": "advance", "arguments": {"next": "lr2"}}`.
/// Operations without parameters take `{}`; `from_json` also accepts a
/// `null` or missing `arguments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum Operation {
    PlanPath {
        start: NodeId,
        target: NodeId,
    },
    PlanPathAvoiding {
        target: NodeId,
        #[serde(default)]
        blocked: BTreeSet<NodeId>,
    },
    Advance {
        next: NodeId,
    },
    NavigateTo {
        target: NodeId,
    },
    MarkBlocked {
        node: NodeId,
    },
    CurrentPosition {},
    CurrentRoom {},
    PickUp {
        item: ItemId,
    },
    DropOff {
        item: ItemId,
        node: NodeId,
    },
    LocationOf {
        item: ItemId,
    },
    AllItems {},
    NodesInRoom {
        room: RoomName,
    },
    RoomInfo {
        room: RoomName,
    },
    UserLocation {},
    BlockedNodes {},
    Snapshot {},
}

impl Operation {
    /// Decode a request, treating a `null` or missing `arguments` as `{}`.
    pub fn from_json(request: &str) -> serde_json::Result<Self> {
        let mut value: serde_json::Value = serde_json::from_str(request)?;
        if let Some(call) = value.as_object_mut() {
            let arguments = call
                .entry("arguments")
                .or_insert(serde_json::Value::Null);
            if arguments.is_null() {
                *arguments = serde_json::Value::Object(serde_json::Map::new());
            }
        }
        serde_json::from_value(value)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::PlanPath { .. } => "plan_path",
            Operation::PlanPathAvoiding { .. } => "plan_path_avoiding",
            Operation::Advance { .. } => "advance",
            Operation::NavigateTo { .. } => "navigate_to",
            Operation::MarkBlocked { .. } => "mark_blocked",
            Operation::CurrentPosition {} => "current_position",
            Operation::CurrentRoom {} => "current_room",
            Operation::PickUp { .. } => "pick_up",
            Operation::DropOff { .. } => "drop_off",
            Operation::LocationOf { .. } => "location_of",
            Operation::AllItems {} => "all_items",
            Operation::NodesInRoom { .. } => "nodes_in_room",
            Operation::RoomInfo { .. } => "room_info",
            Operation::UserLocation {} => "user_location",
            Operation::BlockedNodes {} => "blocked_nodes",
            Operation::Snapshot {} => "snapshot",
        }
    }

    /// Reject blank identifiers before they reach the core.
    pub fn validate(&self) -> DomainResult<()> {
        let fields: Vec<(&str, &str)> = match self {
            Operation::PlanPath { start, target } => {
                vec![("start", start.as_str()), ("target", target.as_str())]
            }
            Operation::PlanPathAvoiding { target, blocked } => std::iter::once(("target", target.as_str()))
                .chain(blocked.iter().map(|b| ("blocked", b.as_str())))
                .collect(),
            Operation::Advance { next } => vec![("next", next.as_str())],
            Operation::NavigateTo { target } => vec![("target", target.as_str())],
            Operation::MarkBlocked { node } => vec![("node", node.as_str())],
            Operation::PickUp { item } | Operation::LocationOf { item } => {
                vec![("item", item.as_str())]
            }
            Operation::DropOff { item, node } => vec![("item", item.as_str()), ("node", node.as_str())],
            Operation::NodesInRoom { room } | Operation::RoomInfo { room } => {
                vec![("room", room.as_str())]
            }
            Operation::CurrentPosition {}
            | Operation::CurrentRoom {}
            | Operation::AllItems {}
            | Operation::UserLocation {}
            | Operation::BlockedNodes {}
            | Operation::Snapshot {} => Vec::new(),
        };
        match fields.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(DomainError::InvalidCommand {
                reason: format!("{}: `{}` must not be empty", self.name(), field),
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OperationOutcome {
    /// Empty when the target is unreachable.
    Path(Vec<NodeId>),
    /// `None` when every route is cut off.
    AvoidingPath(Option<Vec<NodeId>>),
    Step(StepOutcome),
    Navigation(NavigationOutcome),
    Marked { newly_blocked: bool },
    Position { node: NodeId, coordinates: Position2D },
    Room(RoomName),
    Done,
    ItemLocation(ItemLocation),
    Items(BTreeMap<ItemId, NodeId>),
    Nodes(Vec<NodeId>),
    RoomInfo(RoomInfo),
    UserLocation(NodeId),
    BlockedNodes(BTreeSet<NodeId>),
    Snapshot(Box<EpisodeSnapshot>),
}

/// Response envelope for JSON callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<OperationOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CallError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallError {
    pub code: String,
    pub message: String,
}

impl CallResponse {
    pub fn success(outcome: OperationOutcome) -> Self {
        Self {
            ok: true,
            result: Some(outcome),
            error: None,
        }
    }

    pub fn failure(code: &str, message: String) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(CallError {
                code: code.to_string(),
                message,
            }),
        }
    }
}

impl From<DomainResult<OperationOutcome>> for CallResponse {
    fn from(result: DomainResult<OperationOutcome>) -> Self {
        match result {
            Ok(outcome) => CallResponse::success(outcome),
            Err(e) => CallResponse::failure(e.code(), e.to_string()),
        }
    }
}

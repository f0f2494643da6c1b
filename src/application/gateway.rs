use super::environment::{EnvironmentContext, EpisodeSnapshot, ItemLocation, NavigationOutcome, RoomInfo};
use super::operations::{CallResponse, Operation, OperationOutcome, RobotOperations};
use crate::common::DomainResult;
use crate::domains::logger::DynLogger;
use crate::domains::navigation::{ItemId, NodeId, Position2D, RoomName};
use crate::domains::robot::{RobotEvent, RobotEventActor, RobotProjectionStore, StepOutcome};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

/// Serialises access to one episode. Queries share a read lock, anything
/// that moves the robot or changes what is known takes the write lock.
/// Events are forwarded before the write lock is released, so the journal
/// order matches the order of state changes.
#[derive(Clone)]
pub struct OperationGateway {
    env: Arc<RwLock<EnvironmentContext>>,
    events: Option<mpsc::Sender<RobotEvent>>,
}

/// A running gateway with its event actor attached.
pub struct EpisodeHandle {
    pub gateway: OperationGateway,
    pub projections: Arc<RwLock<RobotProjectionStore>>,
    pub actor: JoinHandle<()>,
}

impl OperationGateway {
    /// Gateway without an event sink; recorded events are discarded.
    pub fn new(env: EnvironmentContext) -> Self {
        Self {
            env: Arc::new(RwLock::new(env)),
            events: None,
        }
    }

    pub fn with_event_sink(mut env: EnvironmentContext, sender: mpsc::Sender<RobotEvent>) -> Self {
        for event in env.drain_events() {
            if let Err(e) = sender.try_send(event) {
                tracing::warn!("Dropped initial robot event: {}", e);
            }
        }
        Self {
            env: Arc::new(RwLock::new(env)),
            events: Some(sender),
        }
    }

    /// Wire a `RobotEventActor` to the episode and spawn it on the current runtime.
    pub fn spawn(env: EnvironmentContext, logger: DynLogger) -> EpisodeHandle {
        let buffer = env.rules().event_buffer.max(1);
        let (sender, receiver) = mpsc::channel(buffer);
        let actor = RobotEventActor::new(env.episode_id(), logger, receiver);
        let projections = actor.projection_store();
        let gateway = Self::with_event_sink(env, sender);
        EpisodeHandle {
            gateway,
            projections,
            actor: tokio::spawn(actor.run()),
        }
    }

    pub async fn dispatch(&self, operation: Operation) -> DomainResult<OperationOutcome> {
        operation.validate()?;
        tracing::debug!(operation = operation.name(), "dispatching");
        let outcome = match operation {
            Operation::PlanPath { start, target } => {
                OperationOutcome::Path(self.plan_path(&start, &target).await?)
            }
            Operation::PlanPathAvoiding { target, blocked } => {
                OperationOutcome::AvoidingPath(self.plan_path_avoiding(&target, &blocked).await?)
            }
            Operation::Advance { next } => OperationOutcome::Step(self.advance(&next).await?),
            Operation::NavigateTo { target } => {
                OperationOutcome::Navigation(self.navigate_to(&target).await?)
            }
            Operation::MarkBlocked { node } => OperationOutcome::Marked {
                newly_blocked: self.mark_blocked(&node).await?,
            },
            Operation::CurrentPosition {} => {
                let (node, coordinates) = self.current_position().await;
                OperationOutcome::Position { node, coordinates }
            }
            Operation::CurrentRoom {} => OperationOutcome::Room(self.current_room().await),
            Operation::PickUp { item } => {
                self.pick_up(&item).await?;
                OperationOutcome::Done
            }
            Operation::DropOff { item, node } => {
                self.drop_off(&item, &node).await?;
                OperationOutcome::Done
            }
            Operation::LocationOf { item } => {
                OperationOutcome::ItemLocation(self.location_of(&item).await?)
            }
            Operation::AllItems {} => OperationOutcome::Items(self.all_items().await),
            Operation::NodesInRoom { room } => {
                OperationOutcome::Nodes(self.nodes_in_room(&room).await?)
            }
            Operation::RoomInfo { room } => OperationOutcome::RoomInfo(self.room_info(&room).await?),
            Operation::UserLocation {} => OperationOutcome::UserLocation(self.user_location().await?),
            Operation::BlockedNodes {} => OperationOutcome::BlockedNodes(self.blocked_nodes().await),
            Operation::Snapshot {} => OperationOutcome::Snapshot(Box::new(self.snapshot().await)),
        };
        Ok(outcome)
    }

    /// Decode one JSON request, run it, and encode the reply. Never fails:
    /// malformed requests come back as an `invalid_request` error.
    pub async fn call_json(&self, request: &str) -> serde_json::Value {
        let response = match Operation::from_json(request) {
            Ok(operation) => CallResponse::from(self.dispatch(operation).await),
            Err(e) => CallResponse::failure("invalid_request", e.to_string()),
        };
        serde_json::to_value(&response).unwrap_or_else(|e| {
            serde_json::json!({
                "ok": false,
                "error": { "code": "serialization_error", "message": e.to_string() }
            })
        })
    }

    async fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&EnvironmentContext) -> T + Send,
    {
        let env = self.env.read().await;
        f(&*env)
    }

    async fn mutate<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&mut EnvironmentContext) -> DomainResult<T> + Send,
        T: Send,
    {
        let mut env = self.env.write().await;
        let result = f(&mut *env);
        let events = env.drain_events();
        self.publish(events).await;
        drop(env);
        result
    }

    async fn publish(&self, events: Vec<RobotEvent>) {
        let Some(sender) = &self.events else {
            return;
        };
        for event in events {
            if sender.send(event).await.is_err() {
                tracing::warn!("Robot event channel closed, dropping events");
                return;
            }
        }
    }
}

#[async_trait]
impl RobotOperations for OperationGateway {
    async fn plan_path(&self, start: &str, target: &str) -> DomainResult<Vec<NodeId>> {
        self.mutate(|env| env.plan_path(start, target)).await
    }

    async fn plan_path_avoiding(
        &self,
        target: &str,
        blocked: &BTreeSet<NodeId>,
    ) -> DomainResult<Option<Vec<NodeId>>> {
        self.mutate(|env| env.plan_path_avoiding(target, blocked)).await
    }

    async fn advance(&self, next: &str) -> DomainResult<StepOutcome> {
        self.mutate(|env| env.advance(next)).await
    }

    async fn navigate_to(&self, target: &str) -> DomainResult<NavigationOutcome> {
        self.mutate(|env| env.navigate_to(target)).await
    }

    async fn mark_blocked(&self, node: &str) -> DomainResult<bool> {
        self.mutate(|env| env.mark_blocked(node)).await
    }

    async fn current_position(&self) -> (NodeId, Position2D) {
        self.read(|env| (env.current_position().clone(), env.current_coordinates()))
            .await
    }

    async fn current_room(&self) -> RoomName {
        self.read(|env| env.current_room().to_string()).await
    }

    async fn pick_up(&self, item: &str) -> DomainResult<()> {
        self.mutate(|env| env.pick_up(item)).await
    }

    async fn drop_off(&self, item: &str, node: &str) -> DomainResult<()> {
        self.mutate(|env| env.drop_off(item, node)).await
    }

    async fn location_of(&self, item: &str) -> DomainResult<ItemLocation> {
        self.read(|env| env.location_of(item)).await
    }

    async fn all_items(&self) -> BTreeMap<ItemId, NodeId> {
        self.read(|env| env.all_items()).await
    }

    async fn nodes_in_room(&self, room: &str) -> DomainResult<Vec<NodeId>> {
        self.read(|env| env.nodes_in_room(room)).await
    }

    async fn room_info(&self, room: &str) -> DomainResult<RoomInfo> {
        self.read(|env| env.room_info(room)).await
    }

    async fn user_location(&self) -> DomainResult<NodeId> {
        self.read(|env| env.user_location().cloned()).await
    }

    async fn blocked_nodes(&self) -> BTreeSet<NodeId> {
        self.read(|env| env.blocked_nodes()).await
    }

    async fn snapshot(&self) -> EpisodeSnapshot {
        self.read(|env| env.snapshot()).await
    }
}

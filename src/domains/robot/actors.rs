use super::events::RobotEvent;
use super::projections::RobotTrackingProjection;
use crate::common::{DomainEvent, EventEnvelope};
use crate::domains::logger::DynLogger;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Actor that turns robot events into log lines and read models.
pub struct RobotEventActor {
    episode_id: Uuid,
    logger: DynLogger,
    projection_store: Arc<RwLock<RobotProjectionStore>>,
    event_receiver: mpsc::Receiver<RobotEvent>,
    sequence: u64,
}

impl RobotEventActor {
    pub fn new(
        episode_id: Uuid,
        logger: DynLogger,
        event_receiver: mpsc::Receiver<RobotEvent>,
    ) -> Self {
        Self {
            episode_id,
            logger,
            projection_store: Arc::new(RwLock::new(RobotProjectionStore::new())),
            event_receiver,
            sequence: 0,
        }
    }

    /// Shared handle to the read models; stays valid after `run` is spawned.
    pub fn projection_store(&self) -> Arc<RwLock<RobotProjectionStore>> {
        self.projection_store.clone()
    }

    /// Runs until every sender is dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.event_receiver.recv().await {
            if let Err(e) = self.handle_event(event).await {
                tracing::error!("Failed to handle robot event: {}", e);
            }
        }
        tracing::debug!(episode = %self.episode_id, "robot event stream closed");
    }

    async fn handle_event(&mut self, event: RobotEvent) -> Result<(), String> {
        self.sequence += 1;
        let envelope = EventEnvelope::new(&event, self.episode_id, self.sequence)
            .map_err(|e| format!("Failed to create event envelope: {}", e))?;

        match &event {
            RobotEvent::MoveBlocked { .. } => self.logger.warn(&event.describe()),
            _ => self.logger.info(&event.describe()),
        }

        let mut store = self.projection_store.write().await;
        store.apply_event(&event);
        store.journal.push(envelope);
        Ok(())
    }
}

/// In-memory projection store for robot read models
#[derive(Debug, Default)]
pub struct RobotProjectionStore {
    pub tracking: HashMap<String, RobotTrackingProjection>,
    pub journal: Vec<EventEnvelope>,
}

impl RobotProjectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracking_for(&self, robot_id: &str) -> Option<&RobotTrackingProjection> {
        self.tracking.get(robot_id)
    }

    pub fn apply_event(&mut self, event: &RobotEvent) {
        if let RobotEvent::RobotCreated {
            robot_id,
            start_node,
            timestamp,
            ..
        } = event
        {
            self.tracking.insert(
                robot_id.clone(),
                RobotTrackingProjection::new(robot_id.clone(), start_node.clone(), *timestamp),
            );
            return;
        }

        if let Some(tracking) = self.tracking.get_mut(event.aggregate_id()) {
            tracking.apply_event(event);
        }
    }
}

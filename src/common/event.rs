use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub trait DomainEvent: Send + Sync + Clone {
    fn event_type(&self) -> &'static str;
    fn aggregate_id(&self) -> &str;
    fn occurred_at(&self) -> DateTime<Utc>;

    /// One-line human readable form, used by log sinks.
    fn describe(&self) -> String;
}

/// Serialized form of a domain event as it leaves the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: Uuid,
    pub episode_id: Uuid,
    pub sequence: u64,
    pub aggregate_id: String,
    pub event_type: String,
    pub event_data: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl EventEnvelope {
    pub fn new<E: DomainEvent + Serialize>(
        event: &E,
        episode_id: Uuid,
        sequence: u64,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_id: Uuid::new_v4(),
            episode_id,
            sequence,
            aggregate_id: event.aggregate_id().to_string(),
            event_type: event.event_type().to_string(),
            event_data: serde_json::to_value(event)?,
            occurred_at: event.occurred_at(),
        })
    }
}

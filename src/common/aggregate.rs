use crate::common::{DomainEvent, DomainResult};
use serde::{Deserialize, Serialize};

pub trait AggregateRoot: Send + Sync + Clone {
    type Event: DomainEvent + Serialize + for<'de> Deserialize<'de>;

    fn aggregate_id(&self) -> &str;
    fn version(&self) -> u64;

    /// Apply an event to update the aggregate state
    fn apply(&mut self, event: &Self::Event) -> DomainResult<()>;

    fn uncommitted_events(&self) -> &[Self::Event];

    /// Hand over the recorded events, leaving the buffer empty.
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event>;

    fn add_event(&mut self, event: Self::Event);

    /// Record an event and apply it in one step.
    fn record(&mut self, event: Self::Event) -> DomainResult<()> {
        self.apply(&event)?;
        self.add_event(event);
        Ok(())
    }

    /// Rebuild an aggregate by replaying its history on top of a seed state.
    fn replay(mut seed: Self, history: &[Self::Event]) -> DomainResult<Self> {
        for event in history {
            seed.apply(event)?;
        }
        Ok(seed)
    }
}

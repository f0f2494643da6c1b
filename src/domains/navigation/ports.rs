use super::loader::FloorPlan;
use crate::common::DomainResult;

/// Port through which the core receives its world description.
/// Adapters provide filesystem or embedded sources.
pub trait FloorPlanSource: Send + Sync {
    fn load_floor_plan(&self, name: &str) -> DomainResult<FloorPlan>;

    /// Names accepted by `load_floor_plan`, sorted.
    fn available_floor_plans(&self) -> DomainResult<Vec<String>>;
}

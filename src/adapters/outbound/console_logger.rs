use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Forwards episode messages to the `tracing` subscriber installed by the binary.
struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) {
        tracing::info!(target: "courier_sim::episode", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "courier_sim::episode", "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "courier_sim::episode", "{}", msg);
    }
}

pub fn init_console_logger() -> DynLogger {
    Arc::new(TracingBridge)
}

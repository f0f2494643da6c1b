use std::sync::Arc;

/// Sink the core notifies of movement and blockage events.
///
/// Fire-and-forget: implementations swallow their own failures, nothing in
/// the core depends on a message being delivered.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;

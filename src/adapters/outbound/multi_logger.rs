use super::{init_console_logger, init_file_logger, init_noop_logger};
use crate::config::LoggingConfig;
use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Forwards every message to each of its sinks in order.
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.error(msg));
    }
}

/// Build the episode logger described by `[logging]`. A file sink that
/// cannot be opened is reported and skipped.
pub fn init_configured_logger(config: &LoggingConfig) -> DynLogger {
    let mut sinks = Vec::new();
    if config.console {
        sinks.push(init_console_logger());
    }
    if let Some(path) = &config.file {
        match init_file_logger(path) {
            Ok(file) => sinks.push(file),
            Err(e) => tracing::warn!("{}", e),
        }
    }
    match sinks.len() {
        0 => init_noop_logger(),
        1 => sinks.remove(0),
        _ => Arc::new(MultiLogger::new(sinks)),
    }
}

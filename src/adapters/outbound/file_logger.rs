use crate::domains::logger::{DomainLogger, DynLogger};
use chrono::Utc;
use log::{error as log_error, info as log_info, warn as log_warn};
use std::sync::Arc;

/// Episode log written through `fast_log`. Only one may be initialised per
/// process since `fast_log` installs the global `log` backend.
pub struct FileLogger;

impl FileLogger {
    pub fn init(path: &str) -> Result<(), String> {
        fast_log::init(
            fast_log::config::Config::new()
                .file(path)
                .level(log::LevelFilter::Info),
        )
        .map(|_| ())
        .map_err(|e| format!("Failed to initialize fast_log at {}: {}", path, e))
    }
}

impl DomainLogger for FileLogger {
    fn info(&self, msg: &str) {
        log_info!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn warn(&self, msg: &str) {
        log_warn!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn error(&self, msg: &str) {
        log_error!("{} - {}", Utc::now().to_rfc3339(), msg);
    }
}

pub fn init_file_logger(path: &str) -> Result<DynLogger, String> {
    FileLogger::init(path)?;
    Ok(Arc::new(FileLogger))
}

//! CLI runner for common setup.
//!
//! Owns the logging guard and the async runtime so command handlers only
//! deal with tile loading and output.

use crate::error::CliError;
use mapscii::logging::{default_log_dir, default_log_file, init_logging, LoggingGuard};
use std::future::Future;
use tokio::runtime::Runtime;
use tracing::info;

/// Runner that manages CLI lifecycle.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    runtime: Runtime,
}

impl CliRunner {
    /// Initialize file logging and build a multi-threaded runtime.
    pub fn new() -> Result<Self, CliError> {
        let log_dir = default_log_dir();
        let logging_guard = init_logging(&log_dir, default_log_file())
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;

        Ok(Self {
            logging_guard,
            runtime,
        })
    }

    /// Log the start of a command.
    pub fn log_startup(&self, command: &str) {
        info!(
            version = mapscii::VERSION,
            command,
            log_dir = %default_log_dir().display(),
            "mapscii starting"
        );
    }

    /// Drive a future to completion on the runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

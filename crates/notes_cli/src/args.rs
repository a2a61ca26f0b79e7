//! Command-line and environment configuration.

use clap::Parser;
use notes_core::config::DEFAULT_BASE_URL;
use notes_core::{ClientConfig, ConfigError, ImportancePolicy, LogLevel, LoggingError};
use std::path::PathBuf;
use std::time::Duration;

/// Terminal client for a REST note service.
#[derive(Debug, Parser)]
#[command(name = "notes", version, about)]
pub struct Args {
    /// Service root; notes live under `<base-url>/notes`.
    #[arg(long, env = "NOTES_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Importance of new notes: fixed-false, fixed-true or random.
    #[arg(long, env = "NOTES_IMPORTANCE", default_value = "fixed-false")]
    pub importance: String,

    #[arg(long, env = "NOTES_NOTIFICATION_TTL_MS", default_value_t = 5000)]
    pub notification_ttl_ms: u64,

    #[arg(long, env = "NOTES_REQUEST_TIMEOUT_MS", default_value_t = 10_000)]
    pub request_timeout_ms: u64,

    /// trace|debug|info|warn|error; defaults to debug in debug builds.
    #[arg(long, env = "NOTES_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, env = "NOTES_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Args {
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let importance: ImportancePolicy = self.importance.parse()?;
        Ok(ClientConfig::new(&self.base_url)?
            .with_notification_ttl(Duration::from_millis(self.notification_ttl_ms))?
            .with_request_timeout(Duration::from_millis(self.request_timeout_ms))?
            .with_importance(importance))
    }

    pub fn log_level(&self) -> Result<LogLevel, LoggingError> {
        match self.log_level.as_deref() {
            Some(value) => LogLevel::parse(value),
            None => Ok(LogLevel::build_default()),
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("notes-client").join("logs"))
    }
}

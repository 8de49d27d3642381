//! Logging setup
//!
//! Builds a `tracing-subscriber` registry with an `EnvFilter`, an optional
//! stderr layer and an optional daily-rotated file layer.

use crate::config::LoggingConfig;
use crate::error::{BridgeError, Result};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default level when `RUST_LOG` does not say otherwise
    pub level: Level,

    /// Log to file
    pub file_path: Option<PathBuf>,

    /// Log to stderr
    pub stderr: bool,

    /// Include thread IDs
    pub thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            file_path: None,
            stderr: true,
            thread_ids: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `RUST_LOG`, `TUYA_LOG_FILE` and `TUYA_LOG_STDERR` on top of
    /// this config
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            self.level = level_from_filter(&rust_log).unwrap_or(self.level);
        }

        if let Ok(log_file) = std::env::var("TUYA_LOG_FILE") {
            self.file_path = Some(PathBuf::from(log_file));
        }

        if let Ok(log_stderr) = std::env::var("TUYA_LOG_STDERR") {
            self.stderr = log_stderr.to_lowercase() != "false";
        }

        self
    }

    /// Create config from the `[logging]` section of the bridge config
    pub fn from_settings(settings: &LoggingConfig) -> Self {
        Self {
            level: level_from_filter(&settings.level).unwrap_or(Level::INFO),
            file_path: settings.file.clone(),
            ..Self::default()
        }
    }
}

/// Most verbose level mentioned in a filter string such as
/// `warn,tuya_hap_bridge=debug`
fn level_from_filter(filter: &str) -> Option<Level> {
    filter
        .split(',')
        .filter_map(|directive| {
            let level = directive.rsplit('=').next().unwrap_or(directive);
            Level::from_str(level.trim()).ok()
        })
        .max()
}

/// Initialize logging with the given configuration
pub fn init_logging(config: LogConfig) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    let stderr_layer = config.stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_thread_ids(config.thread_ids)
    });

    let file_layer = match &config.file_path {
        Some(file_path) => {
            let directory = file_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            std::fs::create_dir_all(directory)?;

            let file_name = file_path
                .file_name()
                .unwrap_or_else(|| std::ffi::OsStr::new("tuya-hap-bridge.log"));
            let file_appender = tracing_appender::rolling::daily(directory, file_name);

            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(config.thread_ids),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| BridgeError::config(format!("Failed to install log subscriber: {e}")))
}

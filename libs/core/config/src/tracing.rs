use crate::{env_or_default, ConfigError, Environment, FromEnv};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{
    self,
    format::{DefaultFields, Format},
};
use tracing_subscriber::{prelude::*, EnvFilter};

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "vearch.log";

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in the main() before any fallible operations to ensure
/// colored error output. Safe to call multiple times.
///
/// Configuration:
/// - Shows file:line where errors occur
/// - Hides environment variables (less noise)
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Location of the plain-text log file written next to the console output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogFileConfig {
    pub directory: PathBuf,
    pub file_name: String,
}

impl LogFileConfig {
    pub fn new(directory: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_name: file_name.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Open the file (creating the directory) behind a non-blocking writer.
    ///
    /// The returned guard must stay alive for buffered lines to be flushed.
    pub fn writer(&self) -> Result<(NonBlocking, WorkerGuard), ConfigError> {
        let to_error = |details: String| ConfigError::LogFile {
            path: self.directory.display().to_string(),
            details,
        };

        std::fs::create_dir_all(&self.directory).map_err(|e| to_error(e.to_string()))?;
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(&self.file_name)
            .build(&self.directory)
            .map_err(|e| to_error(e.to_string()))?;

        Ok(tracing_appender::non_blocking(appender))
    }
}

impl FromEnv for LogFileConfig {
    /// Reads from environment variables with sensible defaults:
    /// - LOG_DIR: defaults to "logs"
    /// - LOG_FILE: defaults to "vearch.log"
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(
            env_or_default("LOG_DIR", DEFAULT_LOG_DIR),
            env_or_default("LOG_FILE", DEFAULT_LOG_FILE),
        ))
    }
}

impl Default for LogFileConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_DIR, DEFAULT_LOG_FILE)
    }
}

/// One line per event: timestamp, target, level and message, no colors.
fn file_layer<S>(writer: NonBlocking) -> fmt::Layer<S, DefaultFields, Format, NonBlocking> {
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
}

/// Initialize tracing with environment-aware configuration and error span capture.
///
/// This function sets up **tracing-subscriber** with ErrorLayer for span
/// capture, plus an optional file layer fed through a non-blocking writer.
///
/// - **Production** (`APP_ENV=production`):
///   - JSON format (for log aggregation tools like ELK, Datadog, CloudWatch)
///   - Hides module targets for cleaner logs
///
/// - **Development** (default):
///   - Pretty-printed format (human-readable)
///
/// Environment variables:
/// - `APP_ENV`: Set to "production" for JSON logs (default: "development")
/// - `RUST_LOG`: Override log levels (e.g., "debug", "semantic_api=trace")
///
/// Returns the file writer's guard when a log file was opened. A log file
/// that cannot be opened is reported as a warning and console logging
/// carries on.
///
/// # Multiple Calls
///
/// Safe to call multiple times: if tracing is already initialized the call
/// silently continues (common in tests).
pub fn init_tracing(
    environment: &Environment,
    log_file: Option<&LogFileConfig>,
) -> Option<WorkerGuard> {
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production {
            EnvFilter::new("info,tower_http=warn")
        } else {
            EnvFilter::new("debug,hyper_util=info,reqwest=info")
        }
    });

    let mut file_error = None;
    let (writer, guard) = match log_file.map(LogFileConfig::writer) {
        Some(Ok((writer, guard))) => (Some(writer), Some(guard)),
        Some(Err(e)) => {
            file_error = Some(e);
            (None, None)
        }
        None => (None, None),
    };

    let result = if is_production {
        // Production: JSON format for log aggregation
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(writer.map(file_layer))
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        // Development: Pretty format for readability
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(writer.map(file_layer))
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => {
            info!(
                "Tracing initialized with ErrorLayer. Environment: {:?}",
                environment
            );
        }
        Err(_) => {
            debug!("Tracing already initialized, skipping re-initialization");
        }
    }

    if let Some(e) = file_error {
        warn!("File logging disabled: {}", e);
    }

    guard
}

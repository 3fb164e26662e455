//! Logging setup for the bridge binary
//!
//! Everything in the workspace logs through `tracing`; this module installs
//! the subscriber that decides what reaches stderr.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No output
    Silent,
    /// Compact stderr output, `info` by default
    Development,
    /// Verbose diagnostics with source locations, `debug` by default
    Debug,
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Initialize logging with the specified mode
///
/// The filter is taken from the first of:
///
/// - `level` (the `--log-level` flag)
/// - `ROTEL_LOG_LEVEL`: filter directive (e.g. `debug`, `rotel_state=trace`)
/// - `RUST_LOG`
/// - the mode's default level
pub fn init_logging(mode: LoggingMode, level: Option<&str>) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let filter = create_env_filter(level, "info");

            let subscriber = Registry::default()
                .with(fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact())
                .with(filter);

            subscriber.try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let filter = create_env_filter(level, "debug");

            let subscriber = Registry::default()
                .with(fmt::layer()
                    .pretty()
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true))
                .with(filter);

            subscriber.try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Create an environment filter with fallback to default level
fn create_env_filter(level: Option<&str>, default_level: &str) -> EnvFilter {
    EnvFilter::new(filter_directive(
        level,
        std::env::var("ROTEL_LOG_LEVEL").ok(),
        std::env::var("RUST_LOG").ok(),
        default_level,
    ))
}

fn filter_directive(
    level: Option<&str>,
    rotel_log_level: Option<String>,
    rust_log: Option<String>,
    default_level: &str,
) -> String {
    level
        .map(str::to_string)
        .or(rotel_log_level)
        .or(rust_log)
        .unwrap_or_else(|| default_level.to_string())
}

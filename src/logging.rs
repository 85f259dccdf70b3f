//! Optional structured-logging initialization.
//!
//! The library itself only emits `tracing` events; applications that do not
//! install their own subscriber can use these helpers to get a formatted
//! one scoped to this crate. `RUST_LOG` overrides the configured level.

use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, registry::Registry, util::SubscriberInitExt,
};

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Most detailed debugging information.
    Trace,
    /// Detailed debugging information.
    Debug,
    /// Important events.
    Info,
    /// Potential issues.
    Warn,
    /// Failures.
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    Pretty,
    /// Single-line output.
    Compact,
    /// JSON output for production environments.
    Json,
}

/// Log configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level for this crate's events.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Whether to include the target module path.
    pub show_target: bool,
    /// Whether to include thread IDs.
    pub show_thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            show_target: true,
            show_thread_ids: false,
        }
    }
}

impl LogConfig {
    /// Configuration for development environments.
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            ..Self::default()
        }
    }

    /// Configuration for production environments.
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            show_target: true,
            show_thread_ids: true,
        }
    }
}

fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("restwrap={}", config.level)))
}

fn fmt_layer(config: &LogConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    match config.format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(config.show_target)
            .with_thread_ids(config.show_thread_ids)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(config.show_target)
            .with_thread_ids(config.show_thread_ids)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(config.show_target)
            .with_thread_ids(config.show_thread_ids)
            .boxed(),
    }
}

/// Initializes the logging system.
///
/// # Panics
///
/// Panics if a global subscriber is already installed; use
/// [`try_init_logging`] where that is possible (tests, embedded use).
pub fn init_logging(config: &LogConfig) {
    Registry::default()
        .with(fmt_layer(config).with_filter(env_filter(config)))
        .init();
}

/// Initializes the logging system, ignoring an already-installed subscriber.
pub fn try_init_logging(config: &LogConfig) {
    let _ = Registry::default()
        .with(fmt_layer(config).with_filter(env_filter(config)))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
    }

    #[test]
    fn test_log_config_profiles() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Pretty);

        let config = LogConfig::development();
        assert_eq!(config.level, LogLevel::Debug);

        let config = LogConfig::production();
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.show_thread_ids);
    }

    #[test]
    fn test_try_init_logging_is_repeatable() {
        try_init_logging(&LogConfig::default());
        try_init_logging(&LogConfig::default());
    }
}

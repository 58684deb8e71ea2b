//! Logging infrastructure for Saucier
//!
//! Centralized logging configuration using the tracing ecosystem.

use saucier_core::{Result, SaucierError};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to use JSON format
    pub json_format: bool,
    /// Whether to include timestamps
    pub with_timestamps: bool,
    /// Whether to include file/line information
    pub with_file_info: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamps: true,
            with_file_info: false,
        }
    }
}

/// Initialize the global logger with the given configuration
pub fn init_logger(config: LoggerConfig) -> Result<()> {
    let level = Level::from_str(&config.level).map_err(|e| {
        SaucierError::validation(format!("Invalid log level '{}': {}", config.level, e))
    })?;

    let env_filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("reqwest=warn".parse().unwrap())
        .add_directive("h2=warn".parse().unwrap());

    let fmt_layer = if config.json_format {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_file(config.with_file_info)
            .with_line_number(config.with_file_info)
            .boxed()
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_file(config.with_file_info)
            .with_line_number(config.with_file_info);

        if config.with_timestamps {
            layer.boxed()
        } else {
            layer.without_time().boxed()
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| SaucierError::validation(format!("Failed to initialize logger: {}", e)))?;

    tracing::info!("Logger initialized with level: {}", config.level);
    Ok(())
}

/// Initialize logger with default configuration
pub fn init_default_logger() -> Result<()> {
    init_logger(LoggerConfig::default())
}

/// Initialize logger for testing (reduces noise)
pub fn init_test_logger() {
    let config = LoggerConfig {
        level: "warn".to_string(),
        json_format: false,
        with_timestamps: false,
        with_file_info: false,
    };

    // Ignore errors if already initialized
    let _ = init_logger(config);
}

/// Create a logger configuration from environment variables
pub fn logger_config_from_env() -> LoggerConfig {
    LoggerConfig {
        level: std::env::var("SAUCIER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        json_format: std::env::var("SAUCIER_LOG_JSON")
            .map(|v| v.parse().unwrap_or(false))
            .unwrap_or(false),
        with_timestamps: std::env::var("SAUCIER_LOG_TIMESTAMPS")
            .map(|v| v.parse().unwrap_or(true))
            .unwrap_or(true),
        with_file_info: std::env::var("SAUCIER_LOG_FILE_INFO")
            .map(|v| v.parse().unwrap_or(false))
            .unwrap_or(false),
    }
}

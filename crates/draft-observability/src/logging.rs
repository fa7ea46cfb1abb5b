//! Structured logging with request context.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::request_id::RequestId;

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for production/log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "human" | "text" | "pretty" => Ok(Self::Human),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Logging setup failure.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: LogLevel, format: LogFormat) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let result = match format {
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
        LogFormat::Human => builder.compact().try_init(),
    };
    result.map_err(|e| LoggingError::Init(e.to_string()))
}

/// Per-request logger.
///
/// Stamps every event with the request id, route and elapsed time since
/// the request started.
#[derive(Debug, Clone)]
pub struct RequestLogger {
    request_id: RequestId,
    route: &'static str,
    start_time: Instant,
}

impl RequestLogger {
    /// Create a new logger with request context.
    pub fn new(request_id: RequestId, route: &'static str) -> Self {
        Self {
            request_id,
            route,
            start_time: Instant::now(),
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        let request_id = self.request_id.as_str();
        let route = self.route;
        let elapsed_us = self.elapsed_us();
        match level {
            LogLevel::Trace => tracing::trace!(request_id, route, elapsed_us, "{message}"),
            LogLevel::Debug => tracing::debug!(request_id, route, elapsed_us, "{message}"),
            LogLevel::Info => tracing::info!(request_id, route, elapsed_us, "{message}"),
            LogLevel::Warn => tracing::warn!(request_id, route, elapsed_us, "{message}"),
            LogLevel::Error => tracing::error!(request_id, route, elapsed_us, "{message}"),
        }
    }

    /// Get the request ID.
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn route(&self) -> &'static str {
        self.route
    }

    /// Get elapsed time since logger creation.
    pub fn elapsed_us(&self) -> u64 {
        self.start_time.elapsed().as_micros() as u64
    }
}

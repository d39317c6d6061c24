//! Logging infrastructure for diagram generation
//!
//! Structured logging uses the `tracing` crate. Library code only emits
//! spans and events; installing a subscriber is left to the binary (or a
//! test) through [`init_logging`].
//!
//! # Log Levels
//!
//! - `trace`: every entity registration and edge insertion
//! - `debug`: per-diagram statistics (node and edge counts)
//! - `info`: one line per generated diagram (default)
//! - `warn`: diagnostics forwarded from the layout tool
//! - `error`: diagrams that could not be built or rendered
//!
//! # Log Formats
//!
//! - `compact`: single-line format, good for batch runs
//! - `pretty`: multi-line format with colors, good for development
//! - `json`: JSON format, good for log aggregation systems
//!
//! # Environment Variables
//!
//! - `APIVIZ_LOG_LEVEL`: log level (trace|debug|info|warn|error|off)
//! - `RUST_LOG`: standard `tracing-subscriber` filter directives
//! - `APIVIZ_LOG_FORMAT`: log format (compact|pretty|json)
//!
//! # Filtering Logs
//!
//! ```bash
//! # Only the relationship parser at trace level
//! RUST_LOG="apiviz::plugins::class::relationship=trace" apiviz validate --model api.json
//!
//! # Everything at info, the diagram model at debug
//! RUST_LOG="info,apiviz::plugins::class::database=debug" apiviz generate --model api.json -o out
//! ```

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Initialize the tracing subscriber with the given log level and format
///
/// * `level` - log level or filter directive. Falls back to
///   `APIVIZ_LOG_LEVEL`, then `RUST_LOG`, then `info`.
/// * `format` - `compact`, `pretty` or `json`. Falls back to
///   `APIVIZ_LOG_FORMAT`, then `compact`.
///
/// Fails if the format is unknown or a global subscriber is already set.
/// Output always goes to stderr so generated DOT text on stdout stays clean.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = level
        .map(|s| s.to_string())
        .or_else(|| std::env::var("APIVIZ_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    let log_format = format
        .map(|s| s.to_string())
        .or_else(|| std::env::var("APIVIZ_LOG_FORMAT").ok())
        .unwrap_or_else(|| "compact".to_string());

    let filter = if log_level == "off" {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let format = LogFormat::from_str(&log_format)
        .map_err(|e| format!("Invalid log format: {}", e))?;

    match format {
        LogFormat::Compact => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_level(true)
                        .with_file(false)
                        .with_line_number(false)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .json(),
                )
                .try_init()?;
        }
    }

    Ok(())
}

/// Initialize logging with default settings (info level, compact format)
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}

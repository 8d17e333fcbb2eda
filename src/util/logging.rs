//! Structured logging setup for reviewbox
//!
//! This module initializes the `tracing` ecosystem for the binary. It supports
//! console or JSON output, an optional append-only log file, and configuration
//! through environment variables.
//!
//! # Features
//!
//! - Console output on stderr (stdout stays free for reports)
//! - Optional JSON output for production environments
//! - Optional log file via `REVIEWBOX_LOG_FILE`
//! - `RUST_LOG` overrides the computed filter entirely
//! - Can only be initialized once
//!
//! # Example
//!
//! ```no_run
//! use reviewbox::util::logging;
//! use tracing::{info, warn};
//!
//! logging::init_from_env();
//!
//! info!(file = "report.csv", "Review started");
//! warn!(entry = "notes.bin", "Skipping entry");
//! ```

use std::env;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

/// Noisy transport crates held at `warn` unless `RUST_LOG` says otherwise
const QUIET_TARGETS: &[&str] = &["h2=warn", "hyper=warn", "hyper_util=warn", "reqwest=warn"];

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for `reviewbox` targets
    pub level: Level,

    /// Use JSON output format (for structured logging in production)
    pub use_json: bool,

    /// Include the module target (e.g., reviewbox::archive) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,

    /// Also append plain-text logs to this file
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    /// INFO level, console output with targets, no log file
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
            log_file: None,
        }
    }
}

impl LoggingConfig {
    /// Creates a logging configuration with the specified level
    ///
    /// # Example
    ///
    /// ```
    /// use reviewbox::util::LoggingConfig;
    /// use tracing::Level;
    ///
    /// let config = LoggingConfig::with_level(Level::DEBUG);
    /// assert!(config.log_file.is_none());
    /// ```
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON output with source locations
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            log_file: None,
        }
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Builds the configuration from `REVIEWBOX_LOG_LEVEL`, `REVIEWBOX_LOG_JSON`
    /// and `REVIEWBOX_LOG_FILE`
    pub fn from_env() -> Self {
        let level_str = env::var("REVIEWBOX_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let use_json = env::var("REVIEWBOX_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let log_file = env::var("REVIEWBOX_LOG_FILE")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Self {
            level: parse_level(&level_str),
            use_json,
            log_file,
            ..Default::default()
        }
    }
}

/// Parses a log level from a string
///
/// Unknown values fall back to `Level::INFO` with a warning on stderr.
///
/// # Example
///
/// ```
/// use reviewbox::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("INFO"), Level::INFO);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Builds the filter: `RUST_LOG` when set, otherwise `reviewbox=<level>` with
/// transport crates quieted
pub fn build_filter(level: Level) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }

    let mut filter = EnvFilter::new(format!("warn,reviewbox={}", level));
    for target in QUIET_TARGETS {
        if let Ok(directive) = target.parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

fn open_log_file(path: &Path) -> Option<File> {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!(
                "Cannot open log file {}: {}. Logging to stderr only",
                path.display(),
                e
            );
            None
        }
    }
}

/// Initializes the logging system with the provided configuration
///
/// Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        // Each branch builds its own file layer; the layer type depends on the stack below it
        let log_file = config.log_file.as_deref().and_then(open_log_file);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_writer(std::io::stderr),
                )
                .with(log_file.map(|file| {
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(true)
                        .with_writer(Mutex::new(file))
                }))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_writer(std::io::stderr),
                )
                .with(log_file.map(|file| {
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(true)
                        .with_writer(Mutex::new(file))
                }))
                .init();
        }
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Initializes logging from `REVIEWBOX_*` environment variables
pub fn init_from_env() {
    init_logging(LoggingConfig::from_env());
}

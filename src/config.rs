//! Configuration management for reviewbox
//!
//! Settings are read from environment variables, optionally seeded from a `.env`
//! file, with defaults for everything except the oracle credential.
//!
//! # Environment Variables
//!
//! - `REVIEWBOX_API_URL`: full chat-completions URL - default: "http://localhost:8000/v1/chat/completions"
//! - `REVIEWBOX_API_KEY`: bearer credential for the oracle - **required** to review
//! - `REVIEWBOX_MODEL`: model identifier - default: "mistral-nemo-instruct-2407"
//! - `REVIEWBOX_MAX_TOKENS`: completion budget per unit - default: "1024"
//! - `REVIEWBOX_TEMPERATURE`: sampling temperature - default: "0.3"
//! - `REVIEWBOX_REQUEST_TIMEOUT`: oracle timeout in seconds - default: "120"
//! - `REVIEWBOX_MAX_CHUNK_SIZE`: archive chunk bound in bytes - default: "1500"
//! - `REVIEWBOX_MAX_ENTRY_SIZE`: per-entry archive cap in bytes - default: "10485760"
//! - `REVIEWBOX_ORACLE_CONCURRENCY`: archive chunks in flight - default: "1"
//! - `REVIEWBOX_LANGUAGE`: language the oracle answers in - default: "English"
//! - `REVIEWBOX_REPORT_DIR`: where report artifacts are written - default: system temp dir
//! - `REVIEWBOX_LOG_LEVEL`: logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use reviewbox::ReviewConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! reviewbox::config::load_dotenv();
//! let config = ReviewConfig::default();
//! config.validate()?;
//! let backend = config.create_backend()?;
//! # Ok(())
//! # }
//! ```

use crate::ai::{BackendError, OpenAICompatibleClient};
use crate::archive::{DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MAX_ENTRY_SIZE};
use crate::pipeline::config::{DEFAULT_LANGUAGE, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::pipeline::PipelineConfig;
use crate::report::ReportStore;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const DEFAULT_API_URL: &str = "http://localhost:8000/v1/chat/completions";
const DEFAULT_MODEL: &str = "mistral-nemo-instruct-2407";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const MAX_ORACLE_CONCURRENCY: usize = 16;
const MAX_ENTRY_SIZE_LIMIT: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not specified. Set the REVIEWBOX_API_KEY environment variable")]
    MissingApiKey,

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Backend initialization failed: {0}")]
    BackendInitError(#[from] BackendError),
}

/// Main configuration structure for reviewbox
#[derive(Clone)]
pub struct ReviewConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub max_chunk_size: usize,
    pub max_entry_size: u64,
    pub oracle_concurrency: usize,
    pub language: String,
    pub report_dir: Option<PathBuf>,
    pub log_level: String,
}

/// Loads a `.env` file from the working directory or its parents, if present
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("Ignoring unreadable .env file: {}", e),
    }
}

fn env_parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Default for ReviewConfig {
    /// Reads `REVIEWBOX_*` variables, falling back to defaults for anything
    /// missing or unparsable
    fn default() -> Self {
        let api_key = env::var("REVIEWBOX_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let report_dir = env::var("REVIEWBOX_REPORT_DIR")
            .ok()
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from);

        Self {
            api_url: env::var("REVIEWBOX_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key,
            model: env::var("REVIEWBOX_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_tokens: env_parsed("REVIEWBOX_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            temperature: env_parsed("REVIEWBOX_TEMPERATURE", DEFAULT_TEMPERATURE),
            request_timeout_secs: env_parsed(
                "REVIEWBOX_REQUEST_TIMEOUT",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            max_chunk_size: env_parsed("REVIEWBOX_MAX_CHUNK_SIZE", DEFAULT_MAX_CHUNK_SIZE),
            max_entry_size: env_parsed("REVIEWBOX_MAX_ENTRY_SIZE", DEFAULT_MAX_ENTRY_SIZE),
            oracle_concurrency: env_parsed("REVIEWBOX_ORACLE_CONCURRENCY", 1),
            language: env::var("REVIEWBOX_LANGUAGE")
                .unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string()),
            report_dir,
            log_level: env::var("REVIEWBOX_LOG_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
                .to_lowercase(),
        }
    }
}

impl ReviewConfig {
    /// Validates ranges and the log level
    ///
    /// The API key is not checked here; see [`require_api_key`](Self::require_api_key).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConfigError::ValidationFailed(format!(
                "API URL must start with http:// or https://: {}",
                self.api_url
            )));
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be between 1 second and 10 minutes".to_string(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max tokens must be at least 1".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.max_chunk_size < 64 {
            return Err(ConfigError::ValidationFailed(
                "Max chunk size must be at least 64 bytes".to_string(),
            ));
        }

        if self.max_entry_size == 0 || self.max_entry_size > MAX_ENTRY_SIZE_LIMIT {
            return Err(ConfigError::ValidationFailed(format!(
                "Max entry size must be between 1 byte and {} bytes",
                MAX_ENTRY_SIZE_LIMIT
            )));
        }

        if self.oracle_concurrency == 0 || self.oracle_concurrency > MAX_ORACLE_CONCURRENCY {
            return Err(ConfigError::ValidationFailed(format!(
                "Oracle concurrency must be between 1 and {}",
                MAX_ORACLE_CONCURRENCY
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    /// Creates the HTTP oracle backend from this configuration
    pub fn create_backend(&self) -> Result<Arc<OpenAICompatibleClient>, ConfigError> {
        let api_key = self.require_api_key()?.to_string();
        let client = OpenAICompatibleClient::with_timeout(
            self.api_url.clone(),
            api_key,
            self.model.clone(),
            Duration::from_secs(self.request_timeout_secs),
        )?;
        Ok(Arc::new(client))
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_max_chunk_size(self.max_chunk_size)
            .with_max_entry_size(self.max_entry_size)
            .with_oracle_concurrency(self.oracle_concurrency)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
            .with_language(self.language.clone())
    }

    pub fn report_store(&self) -> ReportStore {
        match &self.report_dir {
            Some(dir) => ReportStore::new(dir),
            None => ReportStore::in_temp_dir(),
        }
    }

    pub fn to_display_map(&self) -> std::collections::BTreeMap<String, String> {
        let mut map = std::collections::BTreeMap::new();

        map.insert("api_url".to_string(), self.api_url.clone());
        map.insert(
            "api_key".to_string(),
            if self.api_key.is_some() { "<set>" } else { "<unset>" }.to_string(),
        );
        map.insert("model".to_string(), self.model.clone());
        map.insert("max_tokens".to_string(), self.max_tokens.to_string());
        map.insert("temperature".to_string(), self.temperature.to_string());
        map.insert(
            "request_timeout_secs".to_string(),
            self.request_timeout_secs.to_string(),
        );
        map.insert("max_chunk_size".to_string(), self.max_chunk_size.to_string());
        map.insert("max_entry_size".to_string(), self.max_entry_size.to_string());
        map.insert(
            "oracle_concurrency".to_string(),
            self.oracle_concurrency.to_string(),
        );
        map.insert("language".to_string(), self.language.clone());
        map.insert(
            "report_dir".to_string(),
            self.report_store().dir().display().to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

impl fmt::Debug for ReviewConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.to_display_map()).finish()
    }
}

impl fmt::Display for ReviewConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reviewbox Configuration:")?;
        writeln!(f, "  API URL: {}", self.api_url)?;
        writeln!(
            f,
            "  API Key: {}",
            if self.api_key.is_some() { "<set>" } else { "<unset>" }
        )?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Max Tokens: {}", self.max_tokens)?;
        writeln!(f, "  Temperature: {}", self.temperature)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Max Chunk Size: {} bytes", self.max_chunk_size)?;
        writeln!(f, "  Max Entry Size: {} bytes", self.max_entry_size)?;
        writeln!(f, "  Oracle Concurrency: {}", self.oracle_concurrency)?;
        writeln!(f, "  Language: {}", self.language)?;
        writeln!(f, "  Report Dir: {}", self.report_store().dir().display())?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

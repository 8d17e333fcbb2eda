use crate::archive::{DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MAX_ENTRY_SIZE};

pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_LANGUAGE: &str = "English";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_chunk_size: usize,
    pub max_entry_size: u64,
    pub oracle_concurrency: usize,
    pub max_tokens: u32,
    pub temperature: f32,
    pub language: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
            oracle_concurrency: 1,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_chunk_size(mut self, max_chunk_size: usize) -> Self {
        self.max_chunk_size = max_chunk_size;
        self
    }

    pub fn with_max_entry_size(mut self, max_entry_size: u64) -> Self {
        self.max_entry_size = max_entry_size;
        self
    }

    /// Number of chunks in flight at once; 0 is treated as 1
    pub fn with_oracle_concurrency(mut self, oracle_concurrency: usize) -> Self {
        self.oracle_concurrency = oracle_concurrency;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

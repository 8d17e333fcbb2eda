use crate::archive::Chunk;
use std::fmt;

/// What one oracle call reviews
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisUnit {
    /// A whole non-archive document
    Document(String),
    /// One packed slice of an archive
    Chunk(Chunk),
}

impl AnalysisUnit {
    pub fn text(&self) -> &str {
        match self {
            AnalysisUnit::Document(text) => text,
            AnalysisUnit::Chunk(chunk) => chunk.text(),
        }
    }
}

/// Outcome of one oracle call; a failure is carried as report content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    Success(String),
    Failure(String),
}

impl AnalysisResult {
    pub fn text(&self) -> &str {
        match self {
            AnalysisResult::Success(text) | AnalysisResult::Failure(text) => text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResult::Success(_))
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

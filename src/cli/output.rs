//! Output formatting for the informational commands
//!
//! `classify` and `config` can print either human-readable text or JSON.
//! Reports themselves are always delivered verbatim.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::ReviewConfig;
use crate::intake::{Classification, UploadedDocument};

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// Human-readable formatted text
    Human,
}

/// What `classify` reports about one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationSummary {
    pub file: String,
    pub supported: bool,
    pub category: Option<String>,
    pub media_type: Option<String>,
    pub bytes: usize,
}

impl ClassificationSummary {
    pub fn new(document: &UploadedDocument, classification: &Classification) -> Self {
        Self {
            file: document.filename().to_string(),
            supported: classification.is_supported(),
            category: classification.kind().map(|k| k.to_string()),
            media_type: document.media_type().map(str::to_string),
            bytes: document.len(),
        }
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_classification(&self, summary: &ClassificationSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(summary)
                .context("Failed to serialize classification to JSON"),
            OutputFormat::Human => {
                let mut output = String::new();
                output.push_str(&format!("File:       {}\n", summary.file));
                output.push_str(&format!(
                    "Category:   {}\n",
                    summary.category.as_deref().unwrap_or("unsupported")
                ));
                output.push_str(&format!(
                    "Media type: {}\n",
                    summary.media_type.as_deref().unwrap_or("unknown")
                ));
                output.push_str(&format!("Size:       {} bytes\n", summary.bytes));
                Ok(output)
            }
        }
    }

    pub fn format_config(&self, config: &ReviewConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config.to_display_map())
                .context("Failed to serialize configuration to JSON"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::TypeClassifier;

    fn summary(name: &str) -> ClassificationSummary {
        let doc = UploadedDocument::new(name, b"a,b\n1,2\n".to_vec());
        let classification = TypeClassifier::new().classify(doc.filename());
        ClassificationSummary::new(&doc, &classification)
    }

    #[test]
    fn test_human_classification() {
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_classification(&summary("table.csv"))
            .unwrap();

        assert!(output.contains("File:       table.csv"));
        assert!(output.contains("Category:   tabular"));
        assert!(output.contains("Size:       8 bytes"));
    }

    #[test]
    fn test_human_unsupported() {
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_classification(&summary("photo.png"))
            .unwrap();

        assert!(output.contains("Category:   unsupported"));
    }

    #[test]
    fn test_json_classification() {
        let output = OutputFormatter::new(OutputFormat::Json)
            .format_classification(&summary("table.csv"))
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["file"], "table.csv");
        assert_eq!(value["supported"], true);
        assert_eq!(value["category"], "tabular");
    }
}

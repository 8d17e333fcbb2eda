//! Filename-based routing of uploaded documents
//!
//! Archives, CSV tables and JSON documents are recognized by extension. Anything
//! else must guess to a media type on [`TEXT_MEDIA_TYPES`] to be reviewed as
//! generic text; everything left over is unsupported.

use std::fmt;
use std::path::Path;

/// Media types accepted for a generic text/code review
pub const TEXT_MEDIA_TYPES: &[&str] = &[
    "text/plain",
    "text/markdown",
    "text/x-markdown",
    "text/x-python",
    "application/x-python",
    "text/x-rust",
    "text/x-c",
    "text/x-java-source",
    "application/javascript",
    "text/javascript",
    "application/typescript",
    "application/x-sh",
    "application/toml",
    "text/x-toml",
    "application/x-yaml",
    "text/yaml",
    "text/x-yaml",
    "application/xml",
    "text/xml",
    "text/html",
    "text/css",
];

/// Handling category of a supported document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Zip container reviewed chunk by chunk
    Archive,
    /// CSV table checked for missing values
    Tabular,
    /// JSON document checked for an array of objects
    Structured,
    /// Plain or source text reviewed in one request
    GenericText,
}

impl DocumentKind {
    /// What the user is told they sent
    pub fn noun(&self) -> &'static str {
        match self {
            DocumentKind::Archive => "archive",
            DocumentKind::Tabular => "CSV file",
            DocumentKind::Structured => "JSON file",
            DocumentKind::GenericText => "file",
        }
    }

    /// Suffix of the report artifact produced for this kind
    pub fn report_suffix(&self) -> &'static str {
        match self {
            DocumentKind::Archive => "",
            _ => ".md",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentKind::Archive => "archive",
            DocumentKind::Tabular => "tabular",
            DocumentKind::Structured => "structured",
            DocumentKind::GenericText => "generic text",
        };
        f.write_str(label)
    }
}

/// Outcome of classifying a declared filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Supported(DocumentKind),
    Unsupported,
}

impl Classification {
    pub fn kind(&self) -> Option<DocumentKind> {
        match self {
            Classification::Supported(kind) => Some(*kind),
            Classification::Unsupported => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Classification::Supported(_))
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Supported(kind) => write!(f, "{}", kind),
            Classification::Unsupported => f.write_str("unsupported"),
        }
    }
}

/// Guesses a media type from filename conventions
pub fn guess_media_type(filename: &str) -> Option<String> {
    mime_guess::from_path(filename)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TypeClassifier;

impl TypeClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, filename: &str) -> Classification {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("zip") => return Classification::Supported(DocumentKind::Archive),
            Some("csv") => return Classification::Supported(DocumentKind::Tabular),
            Some("json") => return Classification::Supported(DocumentKind::Structured),
            _ => {}
        }

        match guess_media_type(filename) {
            Some(media_type) if TEXT_MEDIA_TYPES.contains(&media_type.as_str()) => {
                Classification::Supported(DocumentKind::GenericText)
            }
            _ => Classification::Unsupported,
        }
    }
}

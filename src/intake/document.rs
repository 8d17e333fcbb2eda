use super::classifier::guess_media_type;
use std::fs;
use std::io;
use std::path::Path;

/// A single uploaded artifact, immutable once received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    filename: String,
    bytes: Vec<u8>,
    media_type: Option<String>,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let media_type = guess_media_type(&filename);
        Self {
            filename,
            bytes,
            media_type,
        }
    }

    /// Reads a document from disk, declaring its file name as the upload name
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(filename, bytes))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

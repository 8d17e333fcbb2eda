use super::chunk::{ArchiveEntry, Chunk, ChunkPacker};
use std::io::{Cursor, Read};
use thiserror::Error;
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

/// Default upper bound, in bytes, of one chunk's annotated text
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 1500;

/// Default cap on a single entry's uncompressed size (10 MB).
///
/// Larger entries abort the request so a zip bomb cannot exhaust memory.
pub const DEFAULT_MAX_ENTRY_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Failed to read archive: {0}")]
    Archive(#[from] ZipError),

    #[error("Archive entry '{entry}' is not valid UTF-8 text")]
    Decode { entry: String },

    #[error("Archive entry '{entry}' is {size} bytes, exceeding the {limit} byte limit")]
    EntryTooLarge { entry: String, size: u64, limit: u64 },

    #[error("Failed to read archive entry '{entry}': {source}")]
    Io {
        entry: String,
        #[source]
        source: std::io::Error,
    },
}

/// Decodes a zip held in memory and packs its entries into chunks
#[derive(Debug, Clone, Copy)]
pub struct ArchivePacker {
    max_chunk_size: usize,
    max_entry_size: u64,
}

impl Default for ArchivePacker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNK_SIZE)
    }
}

impl ArchivePacker {
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size,
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
        }
    }

    pub fn with_max_entry_size(mut self, max_entry_size: u64) -> Self {
        self.max_entry_size = max_entry_size;
        self
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Decodes every file entry in container order
    ///
    /// Directory entries are skipped. The first entry that is not UTF-8 text
    /// fails the whole archive.
    pub fn read_entries(&self, bytes: &[u8]) -> Result<Vec<ArchiveEntry>, PackError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }

            let name = file.name().to_string();
            let size = file.size();
            if size > self.max_entry_size {
                warn!(entry = %name, size, "Archive entry exceeds size limit");
                return Err(PackError::EntryTooLarge {
                    entry: name,
                    size,
                    limit: self.max_entry_size,
                });
            }

            let mut raw = Vec::with_capacity(size as usize);
            file.take(self.max_entry_size.saturating_add(1))
                .read_to_end(&mut raw)
                .map_err(|source| PackError::Io {
                    entry: name.clone(),
                    source,
                })?;

            if raw.len() as u64 > self.max_entry_size {
                return Err(PackError::EntryTooLarge {
                    entry: name,
                    size: raw.len() as u64,
                    limit: self.max_entry_size,
                });
            }

            let content = String::from_utf8(raw).map_err(|_| PackError::Decode {
                entry: name.clone(),
            })?;

            debug!(entry = %name, bytes = content.len(), "Decoded archive entry");
            entries.push(ArchiveEntry { name, content });
        }

        Ok(entries)
    }

    pub fn pack_entries(&self, entries: &[ArchiveEntry]) -> Vec<Chunk> {
        let mut packer = ChunkPacker::new(self.max_chunk_size);
        for entry in entries {
            packer.push(entry);
        }
        packer.finish()
    }

    /// Decodes the archive and packs it; nothing is packed if any entry fails
    pub fn pack(&self, bytes: &[u8]) -> Result<Vec<Chunk>, PackError> {
        let entries = self.read_entries(bytes)?;
        Ok(self.pack_entries(&entries))
    }
}

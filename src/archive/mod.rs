//! Zip intake and size-bounded chunking
//!
//! Entries are decoded in container order and packed greedily, first fit by
//! arrival, into [`Chunk`]s whose annotated text stays within a byte bound. An
//! entry is never split, so a single entry larger than the bound becomes its own
//! oversized chunk.

mod chunk;
mod packer;

pub use chunk::{annotate_entry, ArchiveEntry, Chunk, ChunkEntry, ChunkPacker};
pub use packer::{ArchivePacker, PackError, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MAX_ENTRY_SIZE};

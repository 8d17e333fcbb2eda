/// A decoded archive member, alive only while packing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub content: String,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Byte length of the entry once annotated with its name
    pub fn annotated_len(&self) -> usize {
        annotate_entry(&self.name, &self.content).len()
    }
}

/// Prefixes an entry's content with its name so provenance survives chunking
pub fn annotate_entry(name: &str, content: &str) -> String {
    format!("File {}:\n{}\n\n", name, content)
}

/// Provenance of one entry inside a chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkEntry {
    pub name: String,
    /// Length of the decoded content, without annotation
    pub content_len: usize,
}

/// One oracle-sized unit of archive text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    text: String,
    entries: Vec<ChunkEntry>,
}

impl Chunk {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn entries(&self) -> &[ChunkEntry] {
        &self.entries
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Annotated byte length
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the chunk breaks the bound, which only a lone entry may do
    pub fn is_oversized(&self, max_len: usize) -> bool {
        self.len() > max_len
    }

    fn push(&mut self, entry: &ArchiveEntry, annotated: &str) {
        self.text.push_str(annotated);
        self.entries.push(ChunkEntry {
            name: entry.name.clone(),
            content_len: entry.content.len(),
        });
    }
}

/// Greedy accumulator turning entries into bounded chunks
///
/// The bound is checked against annotated lengths: the accumulator plus the
/// incoming annotated entry must not exceed `max_len`. An empty accumulator
/// accepts any entry.
#[derive(Debug)]
pub struct ChunkPacker {
    max_len: usize,
    current: Chunk,
    completed: Vec<Chunk>,
}

impl ChunkPacker {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            current: Chunk::default(),
            completed: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: &ArchiveEntry) {
        let annotated = annotate_entry(&entry.name, &entry.content);

        if !self.current.is_empty() && self.current.len() + annotated.len() > self.max_len {
            self.completed.push(std::mem::take(&mut self.current));
        }

        self.current.push(entry, &annotated);
    }

    pub fn finish(mut self) -> Vec<Chunk> {
        if !self.current.is_empty() {
            self.completed.push(self.current);
        }
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an entry whose annotated length is exactly `annotated_len`
    fn entry_of(name: &str, annotated_len: usize) -> ArchiveEntry {
        let overhead = annotate_entry(name, "").len();
        ArchiveEntry::new(name, "x".repeat(annotated_len - overhead))
    }

    fn pack(entries: &[ArchiveEntry], max_len: usize) -> Vec<Chunk> {
        let mut packer = ChunkPacker::new(max_len);
        for entry in entries {
            packer.push(entry);
        }
        packer.finish()
    }

    #[test]
    fn test_three_800_byte_entries_make_three_chunks() {
        let entries = vec![entry_of("a", 800), entry_of("b", 800), entry_of("c", 800)];
        assert!(entries.iter().all(|e| e.annotated_len() == 800));

        let chunks = pack(&entries, 1500);

        assert_eq!(chunks.len(), 3);
        for (chunk, name) in chunks.iter().zip(["a", "b", "c"]) {
            assert_eq!(chunk.len(), 800);
            assert_eq!(chunk.entry_names().collect::<Vec<_>>(), vec![name]);
        }
    }

    #[test]
    fn test_small_entries_share_a_chunk() {
        let entries = vec![entry_of("a", 500), entry_of("b", 500), entry_of("c", 500)];

        let chunks = pack(&entries, 1500);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 1500);
        assert_eq!(chunks[0].entries().len(), 3);
    }

    #[test]
    fn test_bound_is_inclusive() {
        let chunks = pack(&[entry_of("a", 700), entry_of("b", 800)], 1500);
        assert_eq!(chunks.len(), 1);

        let chunks = pack(&[entry_of("a", 701), entry_of("b", 800)], 1500);
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_oversized_entry_gets_its_own_chunk() {
        let entries = vec![entry_of("small", 100), entry_of("huge", 4000), entry_of("tail", 100)];

        let chunks = pack(&entries, 1500);

        assert_eq!(chunks.len(), 3);
        assert!(!chunks[0].is_oversized(1500));
        assert!(chunks[1].is_oversized(1500));
        assert_eq!(chunks[1].entries().len(), 1);
        assert_eq!(chunks[1].entries()[0].name, "huge");
        assert!(!chunks[2].is_oversized(1500));
    }

    #[test]
    fn test_oversized_first_entry_does_not_emit_empty_chunk() {
        let chunks = pack(&[entry_of("huge", 3000)], 1500);
        assert_eq!(chunks.len(), 1);
        assert!(!chunks[0].is_empty());
    }

    #[test]
    fn test_no_entries_no_chunks() {
        assert!(pack(&[], 1500).is_empty());
    }

    #[test]
    fn test_packing_preserves_content_and_order() {
        let entries: Vec<ArchiveEntry> = (0..40)
            .map(|i| ArchiveEntry::new(format!("src/file_{}.rs", i), "y".repeat((i * 37) % 900)))
            .collect();

        let chunks = pack(&entries, 1500);

        let packed: usize = chunks
            .iter()
            .flat_map(|c| c.entries())
            .map(|e| e.content_len)
            .sum();
        let original: usize = entries.iter().map(|e| e.content.len()).sum();
        assert_eq!(packed, original);

        let names: Vec<&str> = chunks.iter().flat_map(|c| c.entry_names()).collect();
        let expected: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, expected);

        for chunk in &chunks {
            assert!(chunk.len() <= 1500 || chunk.entries().len() == 1);
        }
    }

    #[test]
    fn test_chunk_text_carries_provenance() {
        let chunks = pack(
            &[
                ArchiveEntry::new("main.py", "print(1)"),
                ArchiveEntry::new("util.py", "x = 2"),
            ],
            1500,
        );

        assert_eq!(
            chunks[0].text(),
            "File main.py:\nprint(1)\n\nFile util.py:\nx = 2\n\n"
        );
    }
}

//! Shared helpers for integration tests

#![allow(dead_code)]

use reviewbox::{PipelineConfig, ReportStore, ReviewService};
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Builds an in-memory zip archive, preserving entry order
pub fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in files {
        if name.ends_with('/') {
            writer
                .add_directory(name.to_string(), SimpleFileOptions::default())
                .expect("add zip directory");
            continue;
        }
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .expect("start zip entry");
        writer.write_all(content).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Number of files currently in a report directory
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("read report dir").count()
}

pub fn service_with(
    backend: Arc<dyn reviewbox::OracleBackend>,
    dir: &Path,
    config: PipelineConfig,
) -> ReviewService {
    ReviewService::new(backend, ReportStore::new(dir), &config)
}

use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use std::env;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, error, warn};

/// File name prefix of every report artifact
pub const REPORT_PREFIX: &str = "reviewbox-report-";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to create report in {dir}: {source}")]
    Create {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read report {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove report {path}: {source}")]
    Dispose {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Creates uniquely named report files in one directory
#[derive(Clone)]
pub struct ReportStore {
    dir: PathBuf,
    progress: Arc<dyn ProgressHandler>,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            progress: Arc::new(NoOpHandler),
        }
    }

    /// Store backed by the system temporary directory
    pub fn in_temp_dir() -> Self {
        Self::new(env::temp_dir())
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Opens an empty report for incremental writing
    pub fn begin(&self, suffix: &str) -> Result<ReportWriter, ReportError> {
        let file = tempfile::Builder::new()
            .prefix(REPORT_PREFIX)
            .suffix(suffix)
            .tempfile_in(&self.dir)
            .map_err(|source| ReportError::Create {
                dir: self.dir.clone(),
                source,
            })?;

        debug!(path = %file.path().display(), "Opened report for writing");

        Ok(ReportWriter {
            path: file.path().to_path_buf(),
            out: BufWriter::new(file),
            bytes: 0,
            progress: self.progress.clone(),
        })
    }

    /// Writes `content` as a complete report
    pub fn create(&self, suffix: &str, content: &str) -> Result<ReportHandle, ReportError> {
        let mut writer = self.begin(suffix)?;
        writer.append(content)?;
        writer.finish()
    }

    /// Removes a report; equivalent to [`ReportHandle::dispose`]
    pub fn dispose(&self, mut handle: ReportHandle) -> Result<bool, ReportError> {
        handle.dispose()
    }
}

impl std::fmt::Debug for ReportStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportStore")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

/// A report being populated
///
/// Dropping the writer before [`finish`](Self::finish) deletes the file.
pub struct ReportWriter {
    path: PathBuf,
    out: BufWriter<NamedTempFile>,
    bytes: u64,
    progress: Arc<dyn ProgressHandler>,
}

impl ReportWriter {
    pub fn append(&mut self, text: &str) -> Result<(), ReportError> {
        self.out
            .write_all(text.as_bytes())
            .map_err(|source| ReportError::Write {
                path: self.path.clone(),
                source,
            })?;
        self.bytes += text.len() as u64;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    /// Flushes the report and hands ownership of the file to a [`ReportHandle`]
    pub fn finish(self) -> Result<ReportHandle, ReportError> {
        let ReportWriter {
            path,
            out,
            bytes,
            progress,
        } = self;

        let file = out.into_inner().map_err(|e| ReportError::Write {
            path: path.clone(),
            source: e.into_error(),
        })?;

        file.as_file().sync_all().map_err(|source| ReportError::Write {
            path: path.clone(),
            source,
        })?;

        let kept = file
            .into_temp_path()
            .keep()
            .map_err(|e| ReportError::Write {
                path: path.clone(),
                source: e.error,
            })?;

        progress.on_progress(&ProgressEvent::ReportWritten {
            path: kept.display().to_string(),
            bytes,
        });

        Ok(ReportHandle {
            path: kept,
            bytes,
            disposed: false,
            progress,
        })
    }
}

impl std::fmt::Debug for ReportWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportWriter")
            .field("path", &self.path)
            .field("bytes", &self.bytes)
            .finish_non_exhaustive()
    }
}

/// A fully written report owned by one request
pub struct ReportHandle {
    path: PathBuf,
    bytes: u64,
    disposed: bool,
    progress: Arc<dyn ProgressHandler>,
}

impl ReportHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes == 0
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn read_to_string(&self) -> Result<String, ReportError> {
        fs::read_to_string(&self.path).map_err(|source| ReportError::Read {
            path: self.path.clone(),
            source,
        })
    }

    /// Copies the report to `dest`, returning the number of bytes copied
    pub fn copy_to(&self, dest: &Path) -> Result<u64, ReportError> {
        fs::copy(&self.path, dest).map_err(|source| ReportError::Write {
            path: dest.to_path_buf(),
            source,
        })
    }

    /// Removes the backing file
    ///
    /// Returns whether a file was actually removed. Calling this again, or on a
    /// file someone else already deleted, is a logged no-op.
    pub fn dispose(&mut self) -> Result<bool, ReportError> {
        if self.disposed {
            debug!(path = %self.path.display(), "Report already disposed");
            return Ok(false);
        }

        let existed = match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(source) => {
                error!(path = %self.path.display(), error = %source, "Failed to remove report");
                return Err(ReportError::Dispose {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        self.disposed = true;
        self.progress.on_progress(&ProgressEvent::ReportDisposed {
            path: self.path.display().to_string(),
            existed,
        });
        Ok(existed)
    }
}

impl Drop for ReportHandle {
    fn drop(&mut self) {
        if !self.disposed {
            if let Err(e) = self.dispose() {
                warn!("Report cleanup on drop failed: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for ReportHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportHandle")
            .field("path", &self.path)
            .field("bytes", &self.bytes)
            .field("disposed", &self.disposed)
            .finish()
    }
}

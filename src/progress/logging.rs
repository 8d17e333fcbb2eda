//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, error, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Classified {
                filename,
                category,
                media_type,
            } => {
                info!(
                    file = %filename,
                    category = %category,
                    media_type = media_type.as_deref().unwrap_or("unknown"),
                    "Document classified"
                );
            }
            ProgressEvent::Rejected {
                filename,
                media_type,
            } => {
                warn!(
                    file = %filename,
                    media_type = media_type.as_deref().unwrap_or("unknown"),
                    "Unsupported document type"
                );
            }
            ProgressEvent::ArchivePacked {
                entries,
                chunks,
                oversized_chunks,
            } => {
                info!(entries, chunks, oversized_chunks, "Archive packed");
            }
            ProgressEvent::UnitStarted {
                index,
                total,
                bytes,
            } => {
                debug!(unit = index + 1, total, bytes, "Sending unit to oracle");
            }
            ProgressEvent::UnitCompleted {
                index,
                total,
                success,
                elapsed,
            } => {
                if *success {
                    debug!(
                        unit = index + 1,
                        total,
                        elapsed_ms = elapsed.as_millis(),
                        "Unit analyzed"
                    );
                } else {
                    warn!(
                        unit = index + 1,
                        total,
                        elapsed_ms = elapsed.as_millis(),
                        "Oracle failed for unit, failure recorded in report"
                    );
                }
            }
            ProgressEvent::ReportWritten { path, bytes } => {
                info!(path = %path, bytes, "Report written");
            }
            ProgressEvent::ReportDisposed { path, existed } => {
                if *existed {
                    info!(path = %path, "Temporary report removed");
                } else {
                    info!(path = %path, "Temporary report not found for removal");
                }
            }
            ProgressEvent::Completed { units, total_time } => {
                info!(
                    units,
                    total_time_ms = total_time.as_millis(),
                    "Review complete"
                );
            }
            ProgressEvent::Failed { error: message } => {
                error!(error = %message, "Review failed");
            }
        }
    }
}

//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while a review request moves through the pipeline
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A document was received and classified
    Classified {
        filename: String,
        category: String,
        media_type: Option<String>,
    },

    /// The document was rejected before any processing
    Rejected {
        filename: String,
        media_type: Option<String>,
    },

    /// An archive was packed into chunks
    ArchivePacked {
        entries: usize,
        chunks: usize,
        oversized_chunks: usize,
    },

    /// A unit is about to be sent to the oracle
    UnitStarted { index: usize, total: usize, bytes: usize },

    /// The oracle answered (or failed) for a unit
    UnitCompleted {
        index: usize,
        total: usize,
        success: bool,
        elapsed: Duration,
    },

    /// A report artifact was fully written
    ReportWritten { path: String, bytes: u64 },

    /// A report artifact was removed
    ReportDisposed { path: String, existed: bool },

    /// The request finished successfully
    Completed { units: usize, total_time: Duration },

    /// The request failed
    Failed { error: String },
}

/// Trait for handling progress events during a review
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        let handler = NoOpHandler;
        handler.on_progress(&ProgressEvent::Failed {
            error: "ignored".to_string(),
        });
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::ArchivePacked {
            entries: 3,
            chunks: 2,
            oversized_chunks: 0,
        });
        handler.on_progress(&ProgressEvent::UnitStarted {
            index: 0,
            total: 2,
            bytes: 100,
        });
        handler.on_progress(&ProgressEvent::Completed {
            units: 2,
            total_time: Duration::from_secs(1),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::UnitStarted {
            index: 1,
            total: 4,
            bytes: 10,
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("UnitStarted"));
        assert!(debug_str.contains("index: 1"));
    }
}

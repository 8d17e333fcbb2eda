//! Request-level entry point
//!
//! [`ReviewService`] is what a transport (the CLI, a chat bot) talks to: it
//! classifies the upload, refuses unsupported types before any work, runs the
//! pipeline inside a per-request tracing span, and phrases user-facing notices.

use crate::ai::OracleBackend;
use crate::intake::{Classification, DocumentKind, TypeClassifier, UploadedDocument};
use crate::pipeline::{AnalysisPipeline, PipelineConfig, PipelineError, PipelineReport};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::report::ReportStore;
use std::sync::Arc;
use tracing::{info_span, Instrument};
use uuid::Uuid;

pub const UNSUPPORTED_NOTICE: &str = "Sorry, I can't process this file type.";

/// Result of handling one upload
#[derive(Debug)]
pub enum ReviewOutcome {
    /// Rejected before processing; nothing was created
    Unsupported {
        filename: String,
        media_type: Option<String>,
    },
    /// A finished report ready for delivery
    Completed(PipelineReport),
}

impl ReviewOutcome {
    /// Text the transport shows next to (or instead of) the report
    pub fn notice(&self) -> String {
        match self {
            ReviewOutcome::Unsupported { .. } => UNSUPPORTED_NOTICE.to_string(),
            ReviewOutcome::Completed(output) => completed_notice(output.kind),
        }
    }
}

pub fn completed_notice(kind: DocumentKind) -> String {
    format!(
        "Your {} has been processed, the results are attached.",
        kind.noun()
    )
}

/// Notice for a request that failed after classification
pub fn error_notice(error: impl std::fmt::Display) -> String {
    format!("An error occurred: {}", error)
}

pub struct ReviewService {
    classifier: TypeClassifier,
    pipeline: AnalysisPipeline,
    progress: Arc<dyn ProgressHandler>,
}

impl ReviewService {
    pub fn new(backend: Arc<dyn OracleBackend>, store: ReportStore, config: &PipelineConfig) -> Self {
        Self {
            classifier: TypeClassifier::new(),
            pipeline: AnalysisPipeline::new(backend, store, config),
            progress: Arc::new(NoOpHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.pipeline = self.pipeline.with_progress(progress.clone());
        self.progress = progress;
        self
    }

    pub fn classify(&self, document: &UploadedDocument) -> Classification {
        self.classifier.classify(document.filename())
    }

    pub async fn review(&self, document: &UploadedDocument) -> Result<ReviewOutcome, PipelineError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("review", %request_id, file = %document.filename());

        async {
            let kind = match self.classify(document) {
                Classification::Supported(kind) => kind,
                Classification::Unsupported => {
                    self.progress.on_progress(&ProgressEvent::Rejected {
                        filename: document.filename().to_string(),
                        media_type: document.media_type().map(str::to_string),
                    });
                    return Ok(ReviewOutcome::Unsupported {
                        filename: document.filename().to_string(),
                        media_type: document.media_type().map(str::to_string),
                    });
                }
            };

            self.progress.on_progress(&ProgressEvent::Classified {
                filename: document.filename().to_string(),
                category: kind.to_string(),
                media_type: document.media_type().map(str::to_string),
            });

            match self.pipeline.run(kind, document).await {
                Ok(output) => Ok(ReviewOutcome::Completed(output)),
                Err(e) => {
                    self.progress.on_progress(&ProgressEvent::Failed {
                        error: e.to_string(),
                    });
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}

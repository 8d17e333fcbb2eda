//! reviewbox - oracle-backed review reports for uploaded files
//!
//! This library takes one uploaded file, decides how to review it, and produces a
//! single temporary report artifact that is removed once delivered.
//!
//! # Core Concepts
//!
//! - **Classification**: routing an upload to archive, tabular, structured or
//!   generic-text handling by its declared name
//! - **Oracle**: an external OpenAI-compatible completion service that reviews
//!   text; its failures become report content instead of aborting the request
//! - **Chunking**: archive entries are packed, in order, into size-bounded chunks
//!   that are reviewed one oracle request each
//! - **Reports**: uniquely named temporary files owned by one request
//!
//! # Example Usage
//!
//! ```no_run
//! use reviewbox::{ReviewConfig, ReviewOutcome, ReviewService, UploadedDocument};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ReviewConfig::default();
//! let service = ReviewService::new(
//!     config.create_backend()?,
//!     config.report_store(),
//!     &config.pipeline_config(),
//! );
//!
//! let document = UploadedDocument::from_path(Path::new("sources.zip"))?;
//! if let ReviewOutcome::Completed(mut output) = service.review(&document).await? {
//!     println!("{}", output.report.read_to_string()?);
//!     output.report.dispose()?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`intake`]: uploaded documents and type classification
//! - [`archive`]: zip reading and chunk packing
//! - [`ai`]: oracle backends, prompt and mock
//! - [`pipeline`]: per-category review paths and validators
//! - [`report`]: temporary report artifacts
//! - [`service`]: request entry point and user notices

pub mod ai;
pub mod archive;
pub mod cli;
pub mod config;
pub mod intake;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod service;
pub mod util;

pub use ai::{BackendError, MockOracle, MockResponse, OpenAICompatibleClient, OracleBackend};
pub use archive::{ArchivePacker, Chunk, PackError};
pub use config::{ConfigError, ReviewConfig};
pub use intake::{Classification, DocumentKind, TypeClassifier, UploadedDocument};
pub use pipeline::{
    AnalysisPipeline, AnalysisResult, AnalysisUnit, OracleClient, PipelineConfig, PipelineError,
    PipelineReport,
};
pub use progress::{LoggingHandler, NoOpHandler, ProgressEvent, ProgressHandler};
pub use report::{ReportError, ReportHandle, ReportStore};
pub use service::{ReviewOutcome, ReviewService};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

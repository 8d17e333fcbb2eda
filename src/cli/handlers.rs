//! Command handlers
//!
//! Each handler returns the process exit code: 0 on success, 1 on failure and
//! 2 when the input type is not supported.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::commands::{ClassifyArgs, ConfigArgs, ReviewArgs};
use super::output::{ClassificationSummary, OutputFormatter};
use crate::config::ReviewConfig;
use crate::intake::UploadedDocument;
use crate::pipeline::PipelineReport;
use crate::progress::{LoggingHandler, ProgressHandler};
use crate::service::{error_notice, ReviewOutcome, ReviewService};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_UNSUPPORTED: i32 = 2;

pub async fn handle_review(args: &ReviewArgs, quiet: bool) -> i32 {
    match run_review(args, quiet).await {
        Ok(code) => code,
        Err(e) => {
            error!("Review failed: {:#}", e);
            eprintln!("{}", error_notice(format!("{:#}", e)));
            EXIT_FAILURE
        }
    }
}

fn review_config(args: &ReviewArgs) -> ReviewConfig {
    let mut config = ReviewConfig::default();
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(chunk_size) = args.chunk_size {
        config.max_chunk_size = chunk_size;
    }
    if let Some(language) = &args.language {
        config.language = language.clone();
    }
    config
}

async fn run_review(args: &ReviewArgs, quiet: bool) -> Result<i32> {
    let config = review_config(args);
    config.validate().context("Invalid configuration")?;
    debug!("Effective configuration: {:?}", config);

    let backend = config
        .create_backend()
        .context("Failed to initialize oracle backend")?;

    let progress: Arc<dyn ProgressHandler> = Arc::new(LoggingHandler);
    let service = ReviewService::new(backend, config.report_store(), &config.pipeline_config())
        .with_progress(progress);

    let document = UploadedDocument::from_path(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let outcome = service.review(&document).await?;
    let notice = outcome.notice();

    match outcome {
        ReviewOutcome::Unsupported { filename, .. } => {
            warn!(file = %filename, "Unsupported file type");
            eprintln!("{}", notice);
            Ok(EXIT_UNSUPPORTED)
        }
        ReviewOutcome::Completed(mut output) => {
            let delivered = deliver(&output, args);
            if let Err(e) = output.report.dispose() {
                warn!("Failed to remove report artifact: {}", e);
            }
            delivered?;

            if output.failures() > 0 {
                warn!(
                    failures = output.failures(),
                    units = output.results.len(),
                    "Some units could not be analyzed"
                );
            }
            if !quiet {
                eprintln!("{}", notice);
            }
            Ok(EXIT_SUCCESS)
        }
    }
}

fn deliver(output: &PipelineReport, args: &ReviewArgs) -> Result<()> {
    match &args.output {
        Some(dest) => {
            let bytes = output.report.copy_to(dest)?;
            info!(path = %dest.display(), bytes, "Report delivered");
        }
        None => {
            let text = output.report.read_to_string()?;
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write report to stdout")?;
        }
    }
    Ok(())
}

pub fn handle_classify(args: &ClassifyArgs) -> i32 {
    let document = match UploadedDocument::from_path(&args.file) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", args.file.display(), e);
            return EXIT_FAILURE;
        }
    };

    let classification = crate::intake::TypeClassifier::new().classify(document.filename());
    let summary = ClassificationSummary::new(&document, &classification);

    match OutputFormatter::new(args.format.into()).format_classification(&summary) {
        Ok(text) => {
            println!("{}", text.trim_end());
            if summary.supported {
                EXIT_SUCCESS
            } else {
                EXIT_UNSUPPORTED
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

pub fn handle_config(args: &ConfigArgs) -> i32 {
    let config = ReviewConfig::default();

    if let Err(e) = config.validate() {
        warn!("{}", e);
    }

    match OutputFormatter::new(args.format.into()).format_config(&config) {
        Ok(text) => {
            println!("{}", text.trim_end());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

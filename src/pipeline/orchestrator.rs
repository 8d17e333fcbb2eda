use super::analysis::{AnalysisResult, AnalysisUnit};
use super::config::PipelineConfig;
use super::oracle::OracleClient;
use super::validators::{validate_csv, validate_json};
use crate::ai::{OracleBackend, PromptBuilder};
use crate::archive::{ArchivePacker, PackError};
use crate::intake::{DocumentKind, UploadedDocument};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::report::{ReportError, ReportHandle, ReportStore};
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

pub const PROCESSING_HEADER: &str = "Processing result:";
pub const ARCHIVE_HEADER: &str = "Archive processing result:";
pub const CSV_HEADER: &str = "CSV validation result:";
pub const JSON_HEADER: &str = "JSON validation result:";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("File '{filename}' is not valid UTF-8 text")]
    Decode { filename: String },

    #[error(transparent)]
    Pack(#[from] PackError),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// A delivered review: the report artifact plus the per-unit results behind it
#[derive(Debug)]
pub struct PipelineReport {
    pub kind: DocumentKind,
    pub report: ReportHandle,
    /// One entry per oracle unit, in submission order; empty for validator kinds
    pub results: Vec<AnalysisResult>,
}

impl PipelineReport {
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }
}

/// Runs one classified document through its review path
pub struct AnalysisPipeline {
    oracle: OracleClient,
    packer: ArchivePacker,
    store: ReportStore,
    concurrency: usize,
    progress: Arc<dyn ProgressHandler>,
}

impl AnalysisPipeline {
    pub fn new(backend: Arc<dyn OracleBackend>, store: ReportStore, config: &PipelineConfig) -> Self {
        let oracle = OracleClient::new(
            backend,
            PromptBuilder::new(config.language.clone()),
            config.max_tokens,
            config.temperature,
        );
        let packer =
            ArchivePacker::new(config.max_chunk_size).with_max_entry_size(config.max_entry_size);

        Self {
            oracle,
            packer,
            store,
            concurrency: config.oracle_concurrency.max(1),
            progress: Arc::new(NoOpHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.store = self.store.with_progress(progress.clone());
        self.progress = progress;
        self
    }

    pub fn store(&self) -> &ReportStore {
        &self.store
    }

    pub async fn run(
        &self,
        kind: DocumentKind,
        document: &UploadedDocument,
    ) -> Result<PipelineReport, PipelineError> {
        let start = Instant::now();
        info!(
            file = %document.filename(),
            kind = %kind,
            bytes = document.len(),
            backend = self.oracle.backend_name(),
            "Running review pipeline"
        );

        let (report, results) = match kind {
            DocumentKind::GenericText => self.review_text(document).await?,
            DocumentKind::Archive => self.review_archive(document).await?,
            DocumentKind::Tabular => (self.validate_tabular(document)?, Vec::new()),
            DocumentKind::Structured => (self.validate_structured(document)?, Vec::new()),
        };

        self.progress.on_progress(&ProgressEvent::Completed {
            units: results.len(),
            total_time: start.elapsed(),
        });

        Ok(PipelineReport {
            kind,
            report,
            results,
        })
    }

    async fn review_text(
        &self,
        document: &UploadedDocument,
    ) -> Result<(ReportHandle, Vec<AnalysisResult>), PipelineError> {
        let unit = AnalysisUnit::Document(decode(document)?.to_string());
        let result = self.analyze_unit(0, 1, &unit).await;

        let content = format!("{}\n{}", PROCESSING_HEADER, result.text());
        let report = self
            .store
            .create(DocumentKind::GenericText.report_suffix(), &content)?;

        Ok((report, vec![result]))
    }

    async fn review_archive(
        &self,
        document: &UploadedDocument,
    ) -> Result<(ReportHandle, Vec<AnalysisResult>), PipelineError> {
        let entries = self.packer.read_entries(document.bytes())?;
        let entry_count = entries.len();
        let units: Vec<AnalysisUnit> = self
            .packer
            .pack_entries(&entries)
            .into_iter()
            .map(AnalysisUnit::Chunk)
            .collect();
        drop(entries);

        let max_chunk_size = self.packer.max_chunk_size();
        self.progress.on_progress(&ProgressEvent::ArchivePacked {
            entries: entry_count,
            chunks: units.len(),
            oversized_chunks: units
                .iter()
                .filter(|u| u.text().len() > max_chunk_size)
                .count(),
        });

        let mut writer = self.store.begin(DocumentKind::Archive.report_suffix())?;
        let total = units.len();
        let mut results = Vec::with_capacity(total);

        let mut answers = stream::iter(units.iter().enumerate())
            .map(|(index, unit)| self.analyze_unit(index, total, unit))
            .buffered(self.concurrency);

        while let Some(result) = answers.next().await {
            writer.append(&format!("{}\n{}\n\n", ARCHIVE_HEADER, result.text()))?;
            results.push(result);
        }

        let report = writer.finish()?;
        Ok((report, results))
    }

    fn validate_tabular(&self, document: &UploadedDocument) -> Result<ReportHandle, PipelineError> {
        let messages = validate_csv(decode(document)?)?;
        debug!(messages = messages.len(), "CSV validation finished");

        let content = format!("{}\n{}", CSV_HEADER, messages.join("\n"));
        Ok(self
            .store
            .create(DocumentKind::Tabular.report_suffix(), &content)?)
    }

    fn validate_structured(
        &self,
        document: &UploadedDocument,
    ) -> Result<ReportHandle, PipelineError> {
        let messages = validate_json(decode(document)?);
        debug!(messages = messages.len(), "JSON validation finished");

        let content = format!("{}\n{}", JSON_HEADER, messages.join("\n"));
        Ok(self
            .store
            .create(DocumentKind::Structured.report_suffix(), &content)?)
    }

    async fn analyze_unit(&self, index: usize, total: usize, unit: &AnalysisUnit) -> AnalysisResult {
        self.progress.on_progress(&ProgressEvent::UnitStarted {
            index,
            total,
            bytes: unit.text().len(),
        });

        let start = Instant::now();
        let result = self.oracle.analyze(unit.text()).await;

        self.progress.on_progress(&ProgressEvent::UnitCompleted {
            index,
            total,
            success: result.is_success(),
            elapsed: start.elapsed(),
        });

        result
    }
}

fn decode(document: &UploadedDocument) -> Result<&str, PipelineError> {
    std::str::from_utf8(document.bytes()).map_err(|_| PipelineError::Decode {
        filename: document.filename().to_string(),
    })
}

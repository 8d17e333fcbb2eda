pub mod analysis;
pub mod config;
pub mod oracle;
pub mod orchestrator;
pub mod validators;

pub use analysis::{AnalysisResult, AnalysisUnit};
pub use config::PipelineConfig;
pub use oracle::OracleClient;
pub use orchestrator::{AnalysisPipeline, PipelineError, PipelineReport};

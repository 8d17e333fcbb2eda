pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, ClassifyArgs, Commands, ConfigArgs, ReviewArgs};
pub use handlers::{handle_classify, handle_config, handle_review};
pub use output::{ClassificationSummary, OutputFormat, OutputFormatter};

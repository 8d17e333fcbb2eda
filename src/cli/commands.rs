use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Oracle-backed review reports for uploaded files
#[derive(Parser, Debug)]
#[command(
    name = "reviewbox",
    about = "Oracle-backed review reports for uploaded files",
    version,
    author,
    long_about = "reviewbox classifies an uploaded file and produces a review report. \
                  Plain text documents and zip archives are analyzed by an OpenAI-compatible \
                  completion service; CSV and JSON files are checked locally for missing values."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Review a file and deliver the report",
        long_about = "Classifies FILE, runs its review path and delivers the report, either \
                      to stdout or to the file given with --output. The temporary report \
                      artifact is removed afterwards.\n\n\
                      Examples:\n  \
                      reviewbox review notes.txt\n  \
                      reviewbox review sources.zip -o review.txt\n  \
                      reviewbox review table.csv --chunk-size 4000"
    )]
    Review(ReviewArgs),

    #[command(
        about = "Show how a file would be routed",
        long_about = "Prints the category and media type reviewbox assigns to FILE without \
                      contacting the oracle.\n\n\
                      Examples:\n  \
                      reviewbox classify data.json\n  \
                      reviewbox classify photo.png --format json"
    )]
    Classify(ClassifyArgs),

    #[command(about = "Print the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ReviewArgs {
    #[arg(value_name = "FILE", help = "File to review")]
    pub file: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "OUT",
        help = "Write the report to a file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(short = 'm', long, value_name = "MODEL", help = "Override the oracle model")]
    pub model: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "Override the oracle request timeout")]
    pub timeout: Option<u64>,

    #[arg(
        long,
        value_name = "BYTES",
        help = "Override the archive chunk size bound"
    )]
    pub chunk_size: Option<usize>,

    #[arg(long, value_name = "LANGUAGE", help = "Language the oracle answers in")]
    pub language: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    #[arg(value_name = "FILE", help = "File to classify")]
    pub file: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

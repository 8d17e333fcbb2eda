use reviewbox::cli::commands::{CliArgs, Commands};
use reviewbox::cli::handlers::{handle_classify, handle_config, handle_review};
use reviewbox::util::logging::{init_logging, parse_level, LoggingConfig};
use reviewbox::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    reviewbox::config::load_dotenv();

    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("reviewbox v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Review(review_args) => handle_review(review_args, args.quiet).await,
        Commands::Classify(classify_args) => handle_classify(classify_args),
        Commands::Config(config_args) => handle_config(config_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    init_logging(config);
}

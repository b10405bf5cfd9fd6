use uno_transform::cli::commands::{CliArgs, Commands};
use uno_transform::cli::handlers::{
    handle_bundler_config, handle_check, handle_hash, handle_settings,
};
use uno_transform::util::logging::{init_logging, parse_level, LoggingConfig};
use uno_transform::VERSION;

use clap::Parser;
use std::env;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("uno-transform v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Check(check_args) => handle_check(check_args),
        Commands::BundlerConfig(config_args) => handle_bundler_config(config_args),
        Commands::Settings => handle_settings(),
        Commands::Hash(hash_args) => handle_hash(hash_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("UNO_TRANSFORM_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    };

    let use_json = env::var("UNO_TRANSFORM_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    init_logging(LoggingConfig {
        level,
        use_json,
        ..LoggingConfig::default()
    });
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Source-transform loader for UnoCSS under Turbopack
#[derive(Parser, Debug)]
#[command(
    name = "uno-transform",
    about = "Source-transform loader for UnoCSS under Turbopack",
    version,
    author,
    long_about = "uno-transform runs UnoCSS source transformers over script modules before \
                  the bundler parses them. The CLI inspects which modules the loader would \
                  touch, prints the bundler config that registers it, and shows the cache \
                  key computed for a file."
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
        about = "Report which module paths the loader would transform",
        long_about = "Prints one line per path saying whether the loader accepts it.\n\n\
                      Examples:\n  \
                      uno-transform check src/page.tsx\n  \
                      uno-transform check src/a.ts types/index.d.ts"
    )]
    Check(CheckArgs),

    #[command(
        about = "Print bundler config with the loader registered",
        long_about = "Merges the loader rule into an optional user config file and prints \
                      the result as JSON.\n\n\
                      Examples:\n  \
                      uno-transform bundler-config\n  \
                      uno-transform bundler-config --user next.config.json"
    )]
    BundlerConfig(BundlerConfigArgs),

    #[command(about = "Print resolved loader settings")]
    Settings,

    #[command(about = "Print the cache key for a file")]
    Hash(HashArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    #[arg(value_name = "PATH", required = true, help = "Module paths to check")]
    pub paths: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct BundlerConfigArgs {
    #[arg(long, value_name = "FILE", help = "User bundler config (JSON) to merge")]
    pub user: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PATH",
        help = "Loader module path (defaults to the installed package)"
    )]
    pub loader: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct HashArgs {
    #[arg(value_name = "FILE", help = "Source file to hash")]
    pub file: PathBuf,
}

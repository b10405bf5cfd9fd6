pub mod commands;
pub mod handlers;

pub use commands::{BundlerConfigArgs, CheckArgs, CliArgs, Commands, HashArgs};

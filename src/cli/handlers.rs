use crate::bundler::{default_loader_path, with_transform};
use crate::cache::cache_key;
use crate::cli::commands::{BundlerConfigArgs, CheckArgs, HashArgs};
use crate::filter::is_processable;
use crate::settings::TransformSettings;

use anyhow::{Context, Result};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, error};

pub fn handle_check(args: &CheckArgs) -> i32 {
    for path in &args.paths {
        println!("{}\t{}", check_line(path), path);
    }
    0
}

fn check_line(path: &str) -> &'static str {
    if is_processable(path) {
        "transform"
    } else {
        "skip"
    }
}

pub fn handle_bundler_config(args: &BundlerConfigArgs) -> i32 {
    match bundler_config(args) {
        Ok(rendered) => {
            println!("{}", rendered);
            0
        }
        Err(e) => {
            error!("Failed to build bundler config: {:#}", e);
            1
        }
    }
}

fn bundler_config(args: &BundlerConfigArgs) -> Result<String> {
    let user = match &args.user {
        Some(path) => Some(read_json(path)?),
        None => None,
    };

    let loader = match &args.loader {
        Some(path) => path.clone(),
        None => {
            let cwd = env::current_dir().context("Failed to resolve current directory")?;
            default_loader_path(&cwd)
        }
    };
    debug!(loader = %loader.display(), "Registering loader");

    let merged = with_transform(user.as_ref(), &loader);
    serde_json::to_string_pretty(&merged).context("Failed to serialize bundler config")
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn handle_settings() -> i32 {
    let settings = TransformSettings::default();
    print!("{}", settings);

    match settings.validate() {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}

pub fn handle_hash(args: &HashArgs) -> i32 {
    match hash_file(&args.file) {
        Ok(key) => {
            println!("{}", key);
            0
        }
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

fn hash_file(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(cache_key(&path.display().to_string(), &text))
}

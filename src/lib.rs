//! uno-transform - UnoCSS source transformers as a Turbopack loader
//!
//! This library runs the source transformers configured for UnoCSS (variant
//! groups, directives, attributify JSX and similar) over script modules before
//! the bundler parses them. The bundler calls the loader once per module; the
//! loader decides whether the module is eligible, answers repeat inputs from a
//! bounded content cache, and otherwise runs the configured transformers in
//! phase order against a shared, lazily built generator.
//!
//! # Core Concepts
//!
//! - **Generator**: The UnoCSS engine, built once from the generator options
//!   found in the build-tool config and shared by every transformer call
//! - **Transformer**: A unit that edits module source through an [`EditBuffer`],
//!   tagged with a [`Phase`] and an optional id filter
//! - **Pipeline**: Runs transformers phase by phase, isolating unit failures
//!   and reporting them through a [`DiagnosticSink`]
//!
//! # Example Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use uno_transform::{
//!     ConfigLoader, Invocation, JsonConfigSource, TransformLoader, TransformSettings,
//! };
//!
//! async fn load(
//!     source: &str,
//!     path: &str,
//!     factory: Arc<dyn uno_transform::GeneratorFactory>,
//! ) -> Result<String, uno_transform::GeneratorError> {
//!     let settings = TransformSettings::default();
//!     let source_config = JsonConfigSource::new(settings.config_path(), Default::default());
//!     let loader = TransformLoader::new(&settings, ConfigLoader::new(source_config), factory);
//!
//!     loader.transform(source, &Invocation::for_path(path)).await
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`loader`]: Bundler-facing entry point
//! - [`pipeline`]: Phase-ordered transformer execution
//! - [`generator`]: Lazy generator singleton
//! - [`config`]: Build-tool config discovery
//! - [`bundler`]: Bundler config helper

pub mod buffer;
pub mod bundler;
pub mod cache;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod generator;
pub mod loader;
pub mod pipeline;
pub mod settings;
pub mod transformer;
pub mod util;

pub use buffer::EditBuffer;
pub use cache::{cache_key, content_hash, ContentCache, DEFAULT_CACHE_CAPACITY};
pub use config::{
    BuildToolConfig, ConfigLoader, ConfigOrPath, ConfigSource, GeneratorConfig, JsonConfigSource,
    PluginEntry, PluginOptions, PluginRef, StaticConfigSource,
};
pub use diagnostics::{DiagnosticSink, LoggingSink, NoOpSink, TransformFailure};
pub use error::{ConfigError, EditError, GeneratorError};
pub use filter::is_processable;
pub use generator::{Generator, GeneratorFactory, GeneratorHandle, GeneratorService};
pub use loader::{Invocation, TransformLoader};
pub use pipeline::Pipeline;
pub use settings::{SettingsError, TransformSettings};
pub use transformer::{
    FnTransformer, Phase, TransformContext, TransformUnit, Transformer, TransformerRegistry,
};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Generator configuration and the build-tool plugin list it is found in.

mod source;

pub use source::{ConfigLoader, ConfigSource, JsonConfigSource, StaticConfigSource};

use crate::error::ConfigError;
use crate::transformer::{Phase, TransformUnit};
use std::fmt;

/// Plugin identifier the generator options are registered under.
pub const PLUGIN_NAME: &str = "@unocss/postcss";

/// Options handed to the generator plus the transformers that run against it.
#[derive(Clone, Default)]
pub struct GeneratorConfig {
    pub options: serde_json::Value,
    pub transformers: Vec<TransformUnit>,
}

impl GeneratorConfig {
    pub fn new(options: serde_json::Value) -> Self {
        Self {
            options,
            transformers: Vec::new(),
        }
    }

    pub fn with_transformer(mut self, unit: TransformUnit) -> Self {
        self.transformers.push(unit);
        self
    }

    pub fn with_transformers(mut self, units: impl IntoIterator<Item = TransformUnit>) -> Self {
        self.transformers.extend(units);
        self
    }

    /// Transformers declared for `phase`, in configuration order.
    pub fn transformers_for(&self, phase: Phase) -> Vec<TransformUnit> {
        self.transformers
            .iter()
            .filter(|unit| unit.phase() == phase)
            .cloned()
            .collect()
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .transformers
            .iter()
            .map(|unit| unit.name().unwrap_or("transform"))
            .collect();
        f.debug_struct("GeneratorConfig")
            .field("options", &self.options)
            .field("transformers", &names)
            .finish()
    }
}

/// Evaluated build-tool configuration (a postcss config).
#[derive(Debug, Clone, Default)]
pub struct BuildToolConfig {
    pub plugins: Option<Vec<PluginEntry>>,
}

#[derive(Debug, Clone)]
pub struct PluginEntry {
    pub plugin: PluginRef,
    pub options: Option<PluginOptions>,
}

/// How a plugin is referenced: by package name or by a factory function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginRef {
    Name(String),
    Factory { name: String },
}

impl PluginRef {
    pub fn is_generator_plugin(&self) -> bool {
        match self {
            PluginRef::Name(name) => name == PLUGIN_NAME,
            PluginRef::Factory { name } => {
                name.to_lowercase().contains("unocss") || name.contains("Uno")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PluginOptions {
    pub config_or_path: Option<ConfigOrPath>,
}

#[derive(Debug, Clone)]
pub enum ConfigOrPath {
    Path(String),
    Config(GeneratorConfig),
}

impl BuildToolConfig {
    pub fn with_plugin(mut self, plugin: PluginRef, options: Option<PluginOptions>) -> Self {
        self.plugins
            .get_or_insert_with(Vec::new)
            .push(PluginEntry { plugin, options });
        self
    }

    /// Extracts the generator configuration from the first generator plugin.
    ///
    /// Only an inline configuration object is accepted; a path, missing
    /// options, or no matching plugin is an error.
    pub fn generator_config(&self) -> Result<GeneratorConfig, ConfigError> {
        let plugins = self.plugins.as_ref().ok_or(ConfigError::NoPlugins)?;

        let entry = plugins
            .iter()
            .find(|entry| entry.plugin.is_generator_plugin())
            .ok_or(ConfigError::MissingGeneratorConfig)?;

        match entry
            .options
            .as_ref()
            .and_then(|options| options.config_or_path.as_ref())
        {
            Some(ConfigOrPath::Config(config)) => Ok(config.clone()),
            Some(ConfigOrPath::Path(_)) | None => Err(ConfigError::MissingGeneratorConfig),
        }
    }
}

impl PluginOptions {
    pub fn inline(config: GeneratorConfig) -> Self {
        Self {
            config_or_path: Some(ConfigOrPath::Config(config)),
        }
    }
}

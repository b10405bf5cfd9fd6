use super::{BuildToolConfig, ConfigOrPath, GeneratorConfig, PluginOptions, PluginRef};
use crate::error::ConfigError;
use crate::transformer::TransformerRegistry;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Supplies the evaluated build-tool configuration.
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<BuildToolConfig, ConfigError>;

    /// Human-readable origin used in logs.
    fn describe(&self) -> String {
        "build-tool config".to_string()
    }
}

/// Loads the generator configuration once and keeps it for the process
/// lifetime. Failures are not remembered, so the next call tries again.
pub struct ConfigLoader {
    source: Box<dyn ConfigSource>,
    cached: Mutex<Option<Arc<GeneratorConfig>>>,
    loads: AtomicUsize,
}

impl ConfigLoader {
    pub fn new(source: impl ConfigSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cached: Mutex::new(None),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn load(&self) -> Result<Arc<GeneratorConfig>, ConfigError> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(config) = cached.as_ref() {
            return Ok(config.clone());
        }

        debug!(source = %self.source.describe(), "Loading generator configuration");
        let config = Arc::new(self.source.load()?.generator_config()?);
        self.loads.fetch_add(1, Ordering::SeqCst);

        debug!(
            transformers = config.transformers.len(),
            "Generator configuration loaded"
        );
        *cached = Some(config.clone());
        Ok(config)
    }

    pub fn is_loaded(&self) -> bool {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Number of successful loads from the underlying source.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

/// Source that hands out a fixed configuration or a fixed error.
pub struct StaticConfigSource {
    result: Result<BuildToolConfig, ConfigError>,
}

impl StaticConfigSource {
    pub fn new(config: BuildToolConfig) -> Self {
        Self { result: Ok(config) }
    }

    /// Build-tool config with a single generator plugin carrying `config`.
    pub fn inline(config: GeneratorConfig) -> Self {
        Self::new(BuildToolConfig::default().with_plugin(
            PluginRef::Name(super::PLUGIN_NAME.to_string()),
            Some(PluginOptions::inline(config)),
        ))
    }

    /// Shorthand for an inline config with empty options and `transformers`.
    pub fn uno(transformers: Vec<crate::transformer::TransformUnit>) -> Self {
        Self::inline(
            GeneratorConfig::new(Value::Object(Default::default())).with_transformers(transformers),
        )
    }

    pub fn failing(error: ConfigError) -> Self {
        Self { result: Err(error) }
    }
}

impl ConfigSource for StaticConfigSource {
    fn load(&self) -> Result<BuildToolConfig, ConfigError> {
        self.result.clone()
    }

    fn describe(&self) -> String {
        "static config".to_string()
    }
}

/// Reads a JSON build-tool config, `postcss.config.json` by default.
///
/// ```json
/// {
///   "plugins": [
///     ["autoprefixer", {}],
///     ["@unocss/postcss", { "configOrPath": { "transformers": ["directives"], "shortcuts": {} } }]
///   ]
/// }
/// ```
///
/// A plugin reference may also be `{ "factory": "UnoCSS" }`. Names listed
/// under `transformers` are resolved through the registry; everything else in
/// the object becomes the generator options.
pub struct JsonConfigSource {
    path: PathBuf,
    registry: TransformerRegistry,
}

impl JsonConfigSource {
    pub const DEFAULT_FILE_NAME: &'static str = "postcss.config.json";

    pub fn new(path: impl Into<PathBuf>, registry: TransformerRegistry) -> Self {
        Self {
            path: path.into(),
            registry,
        }
    }

    pub fn in_dir(dir: &Path, registry: TransformerRegistry) -> Self {
        Self::new(dir.join(Self::DEFAULT_FILE_NAME), registry)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Converts a parsed config document into a [`BuildToolConfig`].
    pub fn parse_value(&self, document: &Value) -> BuildToolConfig {
        let plugins = document
            .get("plugins")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(|entry| self.parse_entry(entry)).collect());

        BuildToolConfig { plugins }
    }

    fn parse_entry(&self, entry: &Value) -> Option<super::PluginEntry> {
        let pair = entry.as_array()?;
        let plugin = match pair.first()? {
            Value::String(name) => PluginRef::Name(name.clone()),
            Value::Object(map) => PluginRef::Factory {
                name: map.get("factory")?.as_str()?.to_string(),
            },
            _ => return None,
        };

        let options = pair.get(1).and_then(Value::as_object).map(|options| PluginOptions {
            config_or_path: options
                .get("configOrPath")
                .and_then(|value| self.parse_config_or_path(value)),
        });

        Some(super::PluginEntry { plugin, options })
    }

    fn parse_config_or_path(&self, value: &Value) -> Option<ConfigOrPath> {
        match value {
            Value::String(path) => Some(ConfigOrPath::Path(path.clone())),
            Value::Object(map) => {
                let mut options = map.clone();
                let transformers = match options.remove("transformers") {
                    Some(Value::Array(names)) => self.resolve_transformers(&names),
                    Some(other) => {
                        warn!(value = %other, "Ignoring non-array transformers option");
                        Vec::new()
                    }
                    None => Vec::new(),
                };

                Some(ConfigOrPath::Config(
                    GeneratorConfig::new(Value::Object(options)).with_transformers(transformers),
                ))
            }
            _ => None,
        }
    }

    fn resolve_transformers(&self, names: &[Value]) -> Vec<crate::transformer::TransformUnit> {
        names
            .iter()
            .filter_map(|value| {
                let Some(name) = value.as_str() else {
                    warn!(value = %value, "Skipping transformer entry that is not a name");
                    return None;
                };
                let unit = self.registry.resolve(name);
                if unit.is_none() {
                    warn!(transformer = name, "Skipping unknown transformer");
                }
                unit
            })
            .collect()
    }
}

impl ConfigSource for JsonConfigSource {
    fn load(&self) -> Result<BuildToolConfig, ConfigError> {
        let display = self.path.display().to_string();
        let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::ReadFailed {
            path: display.clone(),
            message: e.to_string(),
        })?;
        let document: Value =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseFailed {
                path: display,
                message: e.to_string(),
            })?;

        Ok(self.parse_value(&document))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::config::JsonConfigSource;
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_MIN_LENGTH: usize = 10;
const DEFAULT_LOG_LEVEL: &str = "info";
const MAX_CACHE_CAPACITY: usize = 1_000_000;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings validation failed: {0}")]
    ValidationFailed(String),
}

/// Loader settings, read from `UNO_TRANSFORM_*` environment variables.
#[derive(Debug, Clone)]
pub struct TransformSettings {
    pub cache_capacity: usize,
    pub min_length: usize,
    pub base_dir: PathBuf,
    pub config_file: String,
    pub log_level: String,
}

impl Default for TransformSettings {
    fn default() -> Self {
        let cache_capacity = env::var("UNO_TRANSFORM_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_CACHE_CAPACITY);

        let min_length = env::var("UNO_TRANSFORM_MIN_LENGTH")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MIN_LENGTH);

        let base_dir = env::var("UNO_TRANSFORM_BASE_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| env::current_dir().ok())
            .unwrap_or_default();

        let config_file = env::var("UNO_TRANSFORM_CONFIG_FILE")
            .unwrap_or_else(|_| JsonConfigSource::DEFAULT_FILE_NAME.to_string());

        let log_level = env::var("UNO_TRANSFORM_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            cache_capacity,
            min_length,
            base_dir,
            config_file,
            log_level,
        }
    }
}

impl TransformSettings {
    /// Built-in defaults rooted at `base_dir`, ignoring the environment.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            min_length: DEFAULT_MIN_LENGTH,
            base_dir: base_dir.into(),
            config_file: JsonConfigSource::DEFAULT_FILE_NAME.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.cache_capacity == 0 {
            return Err(SettingsError::ValidationFailed(
                "Cache capacity must be at least 1".to_string(),
            ));
        }
        if self.cache_capacity > MAX_CACHE_CAPACITY {
            return Err(SettingsError::ValidationFailed(format!(
                "Cache capacity cannot exceed {}",
                MAX_CACHE_CAPACITY
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(SettingsError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Full path of the build-tool config file.
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(&self.config_file)
    }

    pub fn to_display_map(&self) -> std::collections::HashMap<String, String> {
        let mut map = std::collections::HashMap::new();

        map.insert(
            "cache_capacity".to_string(),
            self.cache_capacity.to_string(),
        );
        map.insert("min_length".to_string(), self.min_length.to_string());
        map.insert("base_dir".to_string(), self.base_dir.display().to_string());
        map.insert("config_file".to_string(), self.config_file.clone());
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

impl fmt::Display for TransformSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "uno-transform Settings:")?;
        writeln!(f, "  Cache Capacity: {}", self.cache_capacity)?;
        writeln!(f, "  Min Length: {}", self.min_length)?;
        writeln!(f, "  Base Dir: {}", self.base_dir.display())?;
        writeln!(f, "  Config File: {}", self.config_file)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

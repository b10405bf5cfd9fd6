use std::any::Any;
use thiserror::Error;

/// Errors raised while locating the generator configuration inside the
/// build-tool configuration artifact.
///
/// Messages are kept as strings so the error can be cloned into every caller
/// waiting on the same initialization attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("[UnoCSS-TP] postcss config is invalid (no plugins)")]
    NoPlugins,

    #[error(
        "[UnoCSS-TP] Required object unoConfig: [\"@unocss/postcss\", {{ configOrPath: unoConfig }}]"
    )]
    MissingGeneratorConfig,

    #[error("Failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    ParseFailed { path: String, message: String },
}

/// Errors from the generator initialization attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generator construction failed: {message}")]
    Construction { message: String },
}

impl GeneratorError {
    pub fn construction(error: impl std::fmt::Display) -> Self {
        GeneratorError::Construction {
            message: error.to_string(),
        }
    }
}

/// Invalid edit requested on an [`EditBuffer`](crate::buffer::EditBuffer).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Range {start}..{end} is out of bounds for text of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Offset {0} is not on a character boundary")]
    NotCharBoundary(usize),

    #[error("Range {start}..{end} overlaps an existing edit")]
    Overlap { start: usize, end: usize },

    #[error("Cannot overwrite an empty range at {0}")]
    EmptyRange(usize),
}

/// Renders a caught panic payload as a failure detail.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts_into_generator_error() {
        let err: GeneratorError = ConfigError::NoPlugins.into();
        assert_eq!(err, GeneratorError::Config(ConfigError::NoPlugins));
        assert!(err.to_string().contains("no plugins"));
    }

    #[test]
    fn test_construction_error_message() {
        let err = GeneratorError::construction("preset missing");
        assert_eq!(
            err.to_string(),
            "Generator construction failed: preset missing"
        );
    }

    #[test]
    fn test_missing_config_message_mentions_plugin() {
        let msg = ConfigError::MissingGeneratorConfig.to_string();
        assert!(msg.contains("@unocss/postcss"));
        assert!(msg.contains("configOrPath"));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "panicked: static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "panicked: owned");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "panicked");
    }
}

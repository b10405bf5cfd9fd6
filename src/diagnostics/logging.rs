//! Logging-based diagnostic sink

use super::handler::{relative_to, DiagnosticSink, TransformFailure};
use std::path::PathBuf;
use tracing::error;

/// Sink that logs failures through tracing, with paths relative to `base_dir`
#[derive(Debug, Clone)]
pub struct LoggingSink {
    base_dir: PathBuf,
}

impl LoggingSink {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Sink rooted at the current working directory
    pub fn from_cwd() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }

    pub fn format(&self, failure: &TransformFailure) -> String {
        format!(
            "[UnoCSS-TP] {} failed in {} for {}: {}",
            failure.component,
            failure.unit,
            relative_to(&self.base_dir, &failure.file),
            failure.detail
        )
    }
}

impl DiagnosticSink for LoggingSink {
    fn report(&self, failure: &TransformFailure) {
        error!(
            component = %failure.component,
            unit = %failure.unit,
            file = %relative_to(&self.base_dir, &failure.file),
            "{}",
            self.format(failure)
        );
    }
}

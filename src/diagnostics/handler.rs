//! Diagnostic sink trait and failure record

use std::path::Path;

/// A transformer that failed while processing a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformFailure {
    /// Pipeline component that observed the failure
    pub component: String,

    /// Transformer name, or a generic label when it has none
    pub unit: String,

    /// File identity as handed to the loader
    pub file: String,

    /// Error chain rendered as text
    pub detail: String,
}

/// Receives transformer failures. Reporting must never fail or panic.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, failure: &TransformFailure);
}

/// Sink that drops every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSink;

impl DiagnosticSink for NoOpSink {
    fn report(&self, _failure: &TransformFailure) {}
}

/// `file` relative to `base`, or `file` unchanged when it is outside `base`.
pub fn relative_to(base: &Path, file: &str) -> String {
    Path::new(file)
        .strip_prefix(base)
        .map(|relative| relative.display().to_string())
        .unwrap_or_else(|_| file.to_string())
}

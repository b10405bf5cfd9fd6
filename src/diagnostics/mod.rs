//! Reporting of transformer failures

mod handler;
mod logging;

pub use handler::{relative_to, DiagnosticSink, NoOpSink, TransformFailure};
pub use logging::LoggingSink;

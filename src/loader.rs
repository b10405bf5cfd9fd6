//! Bundler-facing entry point
//!
//! [`TransformLoader`] is called once per module with the raw source and the
//! host's invocation info. It gates on [`is_processable`], answers repeat
//! inputs from the content cache, and otherwise runs the transformer pipeline.

use crate::cache::{cache_key, ContentCache};
use crate::config::ConfigLoader;
use crate::diagnostics::{DiagnosticSink, LoggingSink};
use crate::error::GeneratorError;
use crate::filter::is_processable;
use crate::generator::{GeneratorFactory, GeneratorService};
use crate::pipeline::Pipeline;
use crate::settings::TransformSettings;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

/// What the host bundler tells the loader about the module being loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub resource_path: Option<String>,
    pub resource: Option<String>,
}

impl Invocation {
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            resource_path: Some(path.into()),
            resource: None,
        }
    }

    /// `resource_path`, falling back to `resource`, or empty when neither is set.
    pub fn file_identity(&self) -> &str {
        self.resource_path
            .as_deref()
            .or(self.resource.as_deref())
            .unwrap_or("")
    }
}

pub struct TransformLoader {
    pipeline: Pipeline,
    generator: Arc<GeneratorService>,
    cache: Mutex<ContentCache>,
    min_length: usize,
}

impl TransformLoader {
    pub fn new(
        settings: &TransformSettings,
        config: ConfigLoader,
        factory: Arc<dyn GeneratorFactory>,
    ) -> Self {
        let sink: Arc<dyn DiagnosticSink> = Arc::new(LoggingSink::new(settings.base_dir.clone()));
        Self::with_sink(settings, config, factory, sink)
    }

    pub fn with_sink(
        settings: &TransformSettings,
        config: ConfigLoader,
        factory: Arc<dyn GeneratorFactory>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let generator = Arc::new(GeneratorService::new(Arc::new(config), factory));
        Self {
            pipeline: Pipeline::new(generator.clone(), sink),
            generator,
            cache: Mutex::new(ContentCache::with_capacity(settings.cache_capacity)),
            min_length: settings.min_length,
        }
    }

    /// Returns the transformed source, or `source` itself when the module is
    /// not eligible, too short, or left unchanged by every transformer.
    pub async fn transform(
        &self,
        source: &str,
        invocation: &Invocation,
    ) -> Result<String, GeneratorError> {
        let file = invocation.file_identity();

        if !is_processable(file) {
            trace!(file, "Skipping module that is not processable");
            return Ok(source.to_string());
        }
        // measured in UTF-16 code units, the unit the host bundler counts in
        if source.encode_utf16().count() < self.min_length {
            trace!(file, "Skipping module below minimum length");
            return Ok(source.to_string());
        }

        let key = cache_key(file, source);
        if let Some(cached) = self.lock_cache().get(&key) {
            debug!(file, "Transform cache hit");
            return Ok(cached);
        }

        let output = self
            .pipeline
            .run(source, file)
            .await?
            .unwrap_or_else(|| source.to_string());

        self.lock_cache().insert(key, output.clone());
        Ok(output)
    }

    pub fn cache_len(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn generator(&self) -> &GeneratorService {
        &self.generator
    }

    fn lock_cache(&self) -> MutexGuard<'_, ContentCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

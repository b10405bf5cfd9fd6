use super::{Generator, GeneratorFactory};
use crate::config::GeneratorConfig;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::any::Any;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Generator that renders each token as an empty rule.
pub struct MockGenerator {
    name: String,
    options: serde_json::Value,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            options: serde_json::Value::Null,
        }
    }

    pub fn with_options(options: serde_json::Value) -> Self {
        Self {
            options,
            ..Self::new()
        }
    }

    pub fn shared() -> Arc<dyn Generator> {
        Arc::new(Self::new())
    }

    pub fn options(&self) -> &serde_json::Value {
        &self.options
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, tokens: &BTreeSet<String>) -> Result<String> {
        Ok(tokens
            .iter()
            .map(|token| format!(".{}{{}}", token))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Factory that counts constructions and can be told to fail or stall.
pub struct MockGeneratorFactory {
    constructions: AtomicUsize,
    failures_left: AtomicUsize,
    panics_left: AtomicUsize,
    delay: Option<Duration>,
}

impl MockGeneratorFactory {
    pub fn new() -> Self {
        Self {
            constructions: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(0),
            panics_left: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The first `count` constructions return an error.
    pub fn failing_first(self, count: usize) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    /// The first `count` constructions panic.
    pub fn panicking_first(self, count: usize) -> Self {
        self.panics_left.store(count, Ordering::SeqCst);
        self
    }

    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }
}

impl Default for MockGeneratorFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeneratorFactory for MockGeneratorFactory {
    async fn create(&self, config: Arc<GeneratorConfig>) -> Result<Arc<dyn Generator>> {
        self.constructions.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let should_panic = self
            .panics_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if should_panic {
            panic!("MockGeneratorFactory: configured to panic");
        }

        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(anyhow!("MockGeneratorFactory: configured to fail"));
        }

        Ok(Arc::new(MockGenerator::with_options(config.options.clone())))
    }
}

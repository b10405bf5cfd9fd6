//! Generator engine abstraction
//!
//! The style-generation engine lives outside this crate. Transformers reach
//! it through [`Generator`], and [`GeneratorService`] builds exactly one
//! instance per process through a [`GeneratorFactory`].

mod lazy;
mod mock;

pub use lazy::GeneratorService;
pub use mock::{MockGenerator, MockGeneratorFactory};

use crate::config::GeneratorConfig;
use anyhow::Result;
use async_trait::async_trait;
use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

#[async_trait]
pub trait Generator: Send + Sync {
    fn name(&self) -> &str;

    /// Produces the stylesheet text for a set of utility tokens.
    async fn generate(&self, tokens: &BTreeSet<String>) -> Result<String>;

    /// Lets transformers that know the concrete engine downcast to it.
    fn as_any(&self) -> &dyn Any;
}

#[async_trait]
pub trait GeneratorFactory: Send + Sync {
    async fn create(&self, config: Arc<GeneratorConfig>) -> Result<Arc<dyn Generator>>;
}

/// Shared generator together with the configuration it was built from.
#[derive(Clone)]
pub struct GeneratorHandle {
    pub generator: Arc<dyn Generator>,
    pub config: Arc<GeneratorConfig>,
}

impl GeneratorHandle {
    pub fn ptr_eq(&self, other: &GeneratorHandle) -> bool {
        Arc::ptr_eq(&self.generator, &other.generator)
    }
}

impl fmt::Debug for GeneratorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorHandle")
            .field("generator", &self.generator.name())
            .field("transformers", &self.config.transformers.len())
            .finish()
    }
}

//! Transformer units and the context they run with.

use crate::buffer::EditBuffer;
use crate::generator::Generator;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// Stage a transformer runs in. Stages always run `pre`, `default`, `post`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Pre,
    #[default]
    Default,
    Post,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Pre, Phase::Default, Phase::Post];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Pre => "pre",
            Phase::Default => "default",
            Phase::Post => "post",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a transformer gets besides the buffer. Built fresh per call.
pub struct TransformContext {
    pub generator: Arc<dyn Generator>,
    pub filename: String,
    pub tokens: BTreeSet<String>,
    pub filter: fn(&str) -> bool,
}

impl TransformContext {
    pub fn new(generator: Arc<dyn Generator>, filename: impl Into<String>) -> Self {
        Self {
            generator,
            filename: filename.into(),
            tokens: BTreeSet::new(),
            filter: crate::filter::is_processable,
        }
    }
}

#[async_trait]
pub trait Transformer: Send + Sync {
    /// Label used in diagnostics.
    fn name(&self) -> Option<&str> {
        None
    }

    fn phase(&self) -> Phase {
        Phase::Default
    }

    /// Decides whether this transformer applies to `id`. An error counts as a no.
    fn filter_id(&self, _id: &str) -> Result<bool> {
        Ok(true)
    }

    async fn transform(
        &self,
        buffer: &mut EditBuffer,
        id: &str,
        ctx: &mut TransformContext,
    ) -> Result<()>;
}

pub type TransformUnit = Arc<dyn Transformer>;

type TransformFn =
    dyn Fn(&mut EditBuffer, &str, &mut TransformContext) -> Result<()> + Send + Sync;
type IdFilterFn = dyn Fn(&str) -> Result<bool> + Send + Sync;

/// Transformer backed by a synchronous closure.
pub struct FnTransformer {
    name: Option<String>,
    phase: Phase,
    id_filter: Option<Box<IdFilterFn>>,
    body: Box<TransformFn>,
}

impl FnTransformer {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&mut EditBuffer, &str, &mut TransformContext) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: None,
            phase: Phase::Default,
            id_filter: None,
            body: Box::new(body),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_id_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> Result<bool> + Send + Sync + 'static,
    {
        self.id_filter = Some(Box::new(filter));
        self
    }

    pub fn into_unit(self) -> TransformUnit {
        Arc::new(self)
    }
}

#[async_trait]
impl Transformer for FnTransformer {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn filter_id(&self, id: &str) -> Result<bool> {
        match &self.id_filter {
            Some(filter) => filter(id),
            None => Ok(true),
        }
    }

    async fn transform(
        &self,
        buffer: &mut EditBuffer,
        id: &str,
        ctx: &mut TransformContext,
    ) -> Result<()> {
        (self.body)(buffer, id, ctx)
    }
}

/// Named transformers that configuration files can refer to.
#[derive(Default, Clone)]
pub struct TransformerRegistry {
    units: HashMap<String, TransformUnit>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, unit: TransformUnit) -> &mut Self {
        self.units.insert(name.into(), unit);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<TransformUnit> {
        self.units.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

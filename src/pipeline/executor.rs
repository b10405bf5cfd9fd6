use crate::buffer::EditBuffer;
use crate::diagnostics::{DiagnosticSink, TransformFailure};
use crate::error::{panic_message, GeneratorError};
use crate::generator::{GeneratorHandle, GeneratorService};
use crate::transformer::{Phase, TransformContext, TransformUnit};
use futures_util::FutureExt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

const COMPONENT: &str = "transform";
const UNNAMED_UNIT: &str = "transform";

/// Runs the configured transformers over one module, phase by phase.
///
/// A transformer that errors or panics is reported to the diagnostic sink and
/// skipped; the remaining transformers still see the text as left by the last
/// successful edit.
pub struct Pipeline {
    generator: Arc<GeneratorService>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Pipeline {
    pub fn new(generator: Arc<GeneratorService>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { generator, sink }
    }

    /// Returns the rewritten text, or `None` when the result equals `code`.
    pub async fn run(&self, code: &str, id: &str) -> Result<Option<String>, GeneratorError> {
        let start = Instant::now();
        let handle = self.generator.get().await?;
        let mut current = code.to_string();

        for phase in Phase::ALL {
            let units = handle.config.transformers_for(phase);
            if units.is_empty() {
                continue;
            }

            let phase_start = Instant::now();
            let changed = self.run_phase(&units, &mut current, id, &handle).await;

            debug!(
                phase = %phase,
                file = id,
                transformers = units.len(),
                changed,
                duration_ms = phase_start.elapsed().as_millis(),
                "Phase complete"
            );
        }

        let changed = current != code;
        debug!(
            file = id,
            changed,
            total_time_ms = start.elapsed().as_millis(),
            "Transform pipeline complete"
        );

        Ok(changed.then_some(current))
    }

    async fn run_phase(
        &self,
        units: &[TransformUnit],
        current: &mut String,
        id: &str,
        handle: &GeneratorHandle,
    ) -> bool {
        let mut buffer = EditBuffer::new(current.as_str());
        let mut changed = false;

        for unit in units {
            let label = unit.name().unwrap_or(UNNAMED_UNIT);

            if !Self::accepts(unit, id) {
                trace!(transformer = label, file = id, "Transformer skipped by id filter");
                continue;
            }

            let mut ctx = TransformContext::new(handle.generator.clone(), id);
            let outcome = AssertUnwindSafe(unit.transform(&mut buffer, id, &mut ctx))
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => self.report(label, id, format!("{:#}", e)),
                Err(payload) => self.report(label, id, panic_message(payload.as_ref())),
            }

            if buffer.has_changed() {
                *current = buffer.to_string();
                buffer = EditBuffer::new(current.as_str());
                changed = true;
            }
        }

        changed
    }

    /// A filter that errors or panics is treated like one that said no.
    fn accepts(unit: &TransformUnit, id: &str) -> bool {
        matches!(
            panic::catch_unwind(AssertUnwindSafe(|| unit.filter_id(id))),
            Ok(Ok(true))
        )
    }

    fn report(&self, unit: &str, id: &str, detail: String) {
        self.sink.report(&TransformFailure {
            component: COMPONENT.to_string(),
            unit: unit.to_string(),
            file: id.to_string(),
            detail,
        });
    }
}

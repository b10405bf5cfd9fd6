use super::{GeneratorFactory, GeneratorHandle};
use crate::config::ConfigLoader;
use crate::error::{panic_message, GeneratorError};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

type InitResult = Result<GeneratorHandle, GeneratorError>;
type InitFuture = Shared<BoxFuture<'static, InitResult>>;

enum InitState {
    Uninitialized,
    Initializing { attempt: u64, future: InitFuture },
    Ready(GeneratorHandle),
}

/// Process-wide generator, built on first use.
///
/// Concurrent callers that arrive while an attempt is in flight await the same
/// shared future, so configuration is loaded and the generator constructed at
/// most once per attempt. A failed attempt returns the service to the
/// uninitialized state and the next call starts over.
pub struct GeneratorService {
    loader: Arc<ConfigLoader>,
    factory: Arc<dyn GeneratorFactory>,
    state: Mutex<InitState>,
    attempts: Mutex<u64>,
}

impl GeneratorService {
    pub fn new(loader: Arc<ConfigLoader>, factory: Arc<dyn GeneratorFactory>) -> Self {
        debug!("Creating GeneratorService - construction deferred until first use");
        Self {
            loader,
            factory,
            state: Mutex::new(InitState::Uninitialized),
            attempts: Mutex::new(0),
        }
    }

    pub async fn get(&self) -> InitResult {
        let (attempt, future) = {
            let mut state = self.lock_state();
            match &*state {
                InitState::Ready(handle) => return Ok(handle.clone()),
                InitState::Initializing { attempt, future } => (*attempt, future.clone()),
                InitState::Uninitialized => {
                    let attempt = self.next_attempt();
                    debug!(attempt, "Lazy initialization triggered - building generator");
                    let future = Self::initialize(self.loader.clone(), self.factory.clone())
                        .boxed()
                        .shared();
                    *state = InitState::Initializing {
                        attempt,
                        future: future.clone(),
                    };
                    (attempt, future)
                }
            }
        };

        let result = future.await;
        self.settle(attempt, &result);
        result
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.lock_state(), InitState::Ready(_))
    }

    pub fn loader(&self) -> &ConfigLoader {
        &self.loader
    }

    /// One attempt: load configuration off the runtime, then construct.
    /// A panicking factory is reported as a construction failure.
    async fn initialize(
        loader: Arc<ConfigLoader>,
        factory: Arc<dyn GeneratorFactory>,
    ) -> InitResult {
        let config = tokio::task::spawn_blocking(move || loader.load())
            .await
            .map_err(|e| GeneratorError::Construction {
                message: format!("configuration load aborted: {}", e),
            })??;

        let generator = match AssertUnwindSafe(factory.create(config.clone()))
            .catch_unwind()
            .await
        {
            Ok(Ok(generator)) => generator,
            Ok(Err(e)) => {
                return Err(GeneratorError::Construction {
                    message: format!("{:#}", e),
                })
            }
            Err(payload) => {
                return Err(GeneratorError::Construction {
                    message: panic_message(payload.as_ref()),
                })
            }
        };

        info!(
            generator = generator.name(),
            transformers = config.transformers.len(),
            "Generator initialized"
        );

        Ok(GeneratorHandle { generator, config })
    }

    /// Moves the state out of `Initializing` once `attempt` resolves. Only the
    /// first awaiter of the attempt changes anything.
    fn settle(&self, attempt: u64, result: &InitResult) {
        let mut state = self.lock_state();
        let current = match &*state {
            InitState::Initializing { attempt: current, .. } => *current,
            _ => return,
        };
        if current != attempt {
            return;
        }

        *state = match result {
            Ok(handle) => InitState::Ready(handle.clone()),
            Err(e) => {
                warn!(
                    attempt,
                    error = %e,
                    "Generator initialization failed; will retry on next use"
                );
                InitState::Uninitialized
            }
        };
    }

    fn next_attempt(&self) -> u64 {
        let mut attempts = self.attempts.lock().unwrap_or_else(PoisonError::into_inner);
        *attempts += 1;
        *attempts
    }

    fn lock_state(&self) -> MutexGuard<'_, InitState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//! Conversion session: the single state cell behind a presentation layer
//!
//! Every input change enqueues a conversion that lands after a simulated
//! delay. Under [`RacePolicy::LatestRequest`] a new request aborts the one in
//! flight and the reducer discards completions of superseded requests; under
//! [`RacePolicy::LastFinished`] nothing is cancelled and the last task to
//! finish overwrites the result.

use crate::conversion::convert;
use crate::currency::Currency;
use crate::fx::{RateLookup, RateResolver};
use crate::notify::{Notification, Notifier};
use crate::state::{reduce, ConversionEvent, ConversionState, RacePolicy};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Simulated latency of one conversion
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Configuration for a conversion session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub delay: Duration,
    pub race_policy: RacePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            race_policy: RacePolicy::default(),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the converter state and the delayed conversion tasks
///
/// Must be driven from inside a Tokio runtime.
pub struct ConversionSession<L: RateLookup + 'static> {
    resolver: Arc<RateResolver<L>>,
    notifier: Arc<dyn Notifier>,
    delay: Duration,
    state: Arc<Mutex<ConversionState>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<L: RateLookup + 'static> ConversionSession<L> {
    /// Create a session starting from the default inputs (1 USD to EUR)
    pub fn new(
        resolver: RateResolver<L>,
        notifier: Arc<dyn Notifier>,
        config: SessionConfig,
    ) -> Self {
        let state = ConversionState::new(config.race_policy);
        Self::with_state(resolver, notifier, config, state)
    }

    /// Create a session starting from `state`
    pub fn with_state(
        resolver: RateResolver<L>,
        notifier: Arc<dyn Notifier>,
        config: SessionConfig,
        state: ConversionState,
    ) -> Self {
        Self {
            resolver: Arc::new(resolver),
            notifier,
            delay: config.delay,
            state: Arc::new(Mutex::new(ConversionState {
                race_policy: config.race_policy,
                ..state
            })),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn resolver(&self) -> &RateResolver<L> {
        &self.resolver
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ConversionState {
        lock(&self.state).clone()
    }

    /// Apply an input event; enqueues a conversion when the inputs changed
    ///
    /// Returns the id of the enqueued request, if any.
    pub fn dispatch(&self, event: ConversionEvent) -> Option<u64> {
        let changed = {
            let mut state = lock(&self.state);
            let previous = state.clone();
            *state = reduce(previous.clone(), event);
            state.inputs_changed(&previous)
        };

        if changed {
            self.enqueue()
        } else {
            None
        }
    }

    pub fn set_amount(&self, amount: impl Into<String>) -> Option<u64> {
        self.dispatch(ConversionEvent::AmountChanged(amount.into()))
    }

    pub fn set_source(&self, from: Currency) -> Option<u64> {
        self.dispatch(ConversionEvent::SourceChanged(from))
    }

    pub fn set_target(&self, to: Currency) -> Option<u64> {
        self.dispatch(ConversionEvent::TargetChanged(to))
    }

    pub fn swap(&self) -> Option<u64> {
        self.dispatch(ConversionEvent::Swapped)
    }

    /// Convert the current inputs without changing them
    pub fn convert_now(&self) -> Option<u64> {
        self.enqueue()
    }

    /// Wait until every conversion still in flight has landed or been cancelled
    pub async fn settle(&self) {
        loop {
            let pending = std::mem::take(&mut *lock(&self.tasks));
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                if let Err(e) = handle.await {
                    if !e.is_cancelled() {
                        log::warn!("Conversion task failed: {}", e);
                    }
                }
            }
        }
    }

    fn enqueue(&self) -> Option<u64> {
        // Held until the new task is pushed, so ids and task order agree.
        // Lock order is always tasks, then state.
        let mut tasks = lock(&self.tasks);

        let (id, request, race_policy) = {
            let mut state = lock(&self.state);
            let request = match state.request() {
                Ok(request) => request,
                Err(e) => {
                    log::debug!("Skipping conversion: {}", e);
                    return None;
                }
            };
            let id = state.next_request_id();
            *state = reduce(state.clone(), ConversionEvent::RequestStarted { id });
            (id, request, state.race_policy)
        };

        match race_policy {
            RacePolicy::LatestRequest => {
                for handle in tasks.drain(..) {
                    handle.abort();
                }
            }
            RacePolicy::LastFinished => tasks.retain(|handle| !handle.is_finished()),
        }

        log::debug!(
            "Conversion #{} queued: {} {} -> {}",
            id,
            request.amount_text,
            request.from,
            request.to
        );

        let resolver = Arc::clone(&self.resolver);
        let notifier = Arc::clone(&self.notifier);
        let state = Arc::clone(&self.state);
        let delay = self.delay;

        tasks.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let (event, notification) = match convert(&resolver, &request) {
                Ok(result) => {
                    let notification = Notification::completed(&result);
                    (ConversionEvent::Completed { id, result }, notification)
                }
                Err(e) => {
                    let message = e.to_string();
                    let notification = Notification::failed(&request, &message);
                    (ConversionEvent::Failed { id, message }, notification)
                }
            };

            let accepted = {
                let mut state = lock(&state);
                let accepted = state.accepts(id);
                *state = reduce(state.clone(), event);
                accepted
            };

            if accepted {
                log::info!("Conversion #{}: {}", id, notification.description);
                notifier.notify(&notification);
            } else {
                log::debug!("Conversion #{} superseded, result discarded", id);
            }
        }));

        Some(id)
    }
}

impl<L: RateLookup + 'static> Drop for ConversionSession<L> {
    fn drop(&mut self) {
        for handle in lock(&self.tasks).drain(..) {
            handle.abort();
        }
    }
}

pub mod config;
pub mod emptiness;
pub mod source;
pub mod types;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use tokio_util::sync::CancellationToken;

use crate::resolver::emptiness::Emptiness;
use crate::resolver::source::{Source, SourceChain};
use crate::resolver::types::{Attempt, Outcome, ProbeFailure, ResolutionResult};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("fallback_resolutions_total", "Resolve calls started.");
        describe_counter!(
            "fallback_attempts_total",
            "Probes run, labelled by outcome."
        );
        describe_counter!(
            "fallback_provider_errors_total",
            "Probe errors (including panics and timeouts), labelled by provider."
        );
        describe_counter!(
            "fallback_misses_total",
            "Resolve calls that ended without a winner."
        );
        describe_counter!(
            "fallback_cancelled_total",
            "Resolve calls stopped by their cancellation token."
        );
        describe_histogram!("fallback_probe_ms", "Probe duration in milliseconds.");
    });
}

type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Tries sources strictly in order and stops at the first non-empty value.
///
/// A probe error (or panic) is recorded against its source and the search moves
/// on; nothing a probe does can abort the run or reach the caller as an error.
pub struct FallbackResolver<T> {
    is_empty: Predicate<T>,
    cancel: Option<CancellationToken>,
}

impl<T> Clone for FallbackResolver<T> {
    fn clone(&self) -> Self {
        Self {
            is_empty: Arc::clone(&self.is_empty),
            cancel: self.cancel.clone(),
        }
    }
}

impl<T: Emptiness + Send + 'static> FallbackResolver<T> {
    pub fn new() -> Self {
        Self::with_predicate(|v: &T| v.is_empty_value())
    }
}

impl<T: Emptiness + Send + 'static> Default for FallbackResolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> FallbackResolver<T> {
    /// Use a custom emptiness predicate for value types without an `Emptiness` impl.
    pub fn with_predicate<F>(is_empty: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            is_empty: Arc::new(is_empty),
            cancel: None,
        }
    }

    /// Checked before each probe. A probe that already started is never interrupted.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }

    pub async fn resolve(&self, sources: &SourceChain<T>) -> ResolutionResult<T> {
        ensure_metrics_described();
        counter!("fallback_resolutions_total").increment(1);

        let mut attempts = Vec::with_capacity(sources.len());
        let mut cancelled = false;

        for source in sources.iter() {
            if self.is_cancelled() {
                cancelled = true;
                counter!("fallback_cancelled_total").increment(1);
                tracing::info!(
                    target: "fallback",
                    attempted = attempts.len(),
                    remaining = sources.len() - attempts.len(),
                    "resolution cancelled"
                );
                break;
            }

            let t0 = std::time::Instant::now();
            let outcome = self.run_probe(source).await;
            histogram!("fallback_probe_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
            counter!("fallback_attempts_total", "outcome" => outcome.label()).increment(1);

            match &outcome {
                Outcome::Success(_) => {
                    tracing::info!(target: "fallback", provider = source.name(), "provider matched");
                }
                Outcome::Empty => {
                    tracing::debug!(target: "fallback", provider = source.name(), "provider had nothing");
                }
                Outcome::Failure(f) => {
                    tracing::warn!(
                        target: "fallback",
                        provider = source.name(),
                        error = %f.reason,
                        "provider probe failed"
                    );
                    counter!(
                        "fallback_provider_errors_total",
                        "provider" => source.name().to_string()
                    )
                    .increment(1);
                }
            }

            let matched = outcome.is_success();
            attempts.push(Attempt {
                source: source.name().to_string(),
                outcome,
            });
            if matched {
                break;
            }
        }

        let result = ResolutionResult::new(attempts, cancelled);
        if result.is_miss() {
            counter!("fallback_misses_total").increment(1);
            tracing::info!(target: "fallback", attempts = %result.summary(), "no provider matched");
        }
        result
    }

    async fn run_probe(&self, source: &dyn Source<T>) -> Outcome<T> {
        match AssertUnwindSafe(async { source.probe().await })
            .catch_unwind()
            .await
        {
            Ok(Ok(v)) if (self.is_empty)(&v) => Outcome::Empty,
            Ok(Ok(v)) => Outcome::Success(v),
            Ok(Err(e)) => Outcome::Failure(ProbeFailure::from_error(source.name(), &e)),
            Err(panic) => Outcome::Failure(ProbeFailure::new(
                source.name(),
                format!("probe panicked: {}", panic_message(panic.as_ref())),
            )),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

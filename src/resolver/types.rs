// src/resolver/types.rs
use serde::Serialize;
use std::fmt;

/// A probe error flattened to text, tagged with the source that raised it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProbeFailure {
    pub source: String,
    pub reason: String,
}

impl ProbeFailure {
    pub fn new(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            reason: reason.into(),
        }
    }

    /// Render the whole `anyhow` context chain, outermost first.
    pub fn from_error(source: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::new(source, format!("{err:#}"))
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.reason)
    }
}

/// Result of a single probe.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Outcome<T> {
    Success(T),
    Empty,
    Failure(ProbeFailure),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Stable label, also used as the `outcome` metrics label.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::Empty => "empty",
            Outcome::Failure(_) => "failure",
        }
    }

    pub fn failure(&self) -> Option<&ProbeFailure> {
        match self {
            Outcome::Failure(f) => Some(f),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Attempt<T> {
    pub source: String,
    pub outcome: Outcome<T>,
}

/// Everything one `resolve` call observed, in probe order.
///
/// The winner is never stored separately: it is the last attempt when that
/// attempt is a `Success`. Because the resolver stops at the first success,
/// at most one `Success` can ever be recorded.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResolutionResult<T> {
    attempts: Vec<Attempt<T>>,
    cancelled: bool,
}

impl<T> ResolutionResult<T> {
    pub(crate) fn new(attempts: Vec<Attempt<T>>, cancelled: bool) -> Self {
        debug_assert!(
            attempts
                .iter()
                .rev()
                .skip(1)
                .all(|a| !a.outcome.is_success()),
            "a success may only be the last attempt"
        );
        Self {
            attempts,
            cancelled,
        }
    }

    fn winning_attempt(&self) -> Option<&Attempt<T>> {
        self.attempts.last().filter(|a| a.outcome.is_success())
    }

    pub fn winner(&self) -> Option<&str> {
        self.winning_attempt().map(|a| a.source.as_str())
    }

    pub fn value(&self) -> Option<&T> {
        match self.winning_attempt().map(|a| &a.outcome) {
            Some(Outcome::Success(v)) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(mut self) -> Option<T> {
        match self.attempts.pop().map(|a| a.outcome) {
            Some(Outcome::Success(v)) => Some(v),
            _ => None,
        }
    }

    pub fn attempts(&self) -> &[Attempt<T>] {
        &self.attempts
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProbeFailure> {
        self.attempts.iter().filter_map(|a| a.outcome.failure())
    }

    /// No source produced data (includes the empty-chain case).
    pub fn is_miss(&self) -> bool {
        self.winning_attempt().is_none()
    }

    /// At least one source was probed and every one of them errored.
    pub fn all_failed(&self) -> bool {
        !self.attempts.is_empty() && self.attempts.iter().all(|a| a.outcome.is_failure())
    }

    /// The run was stopped between probes by its cancellation token.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// One-line diagnostic, e.g. `LRCLIB=empty, KPoe=failure(timeout), Genius=success`.
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = self
            .attempts
            .iter()
            .map(|a| match &a.outcome {
                Outcome::Failure(f) => format!("{}=failure({})", a.source, f.reason),
                other => format!("{}={}", a.source, other.label()),
            })
            .collect();
        if self.cancelled {
            parts.push("<cancelled>".to_string());
        }
        if parts.is_empty() {
            return "<no sources>".to_string();
        }
        parts.join(", ")
    }
}

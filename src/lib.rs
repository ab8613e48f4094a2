// src/lib.rs
// Public library surface for hosts, the demo binary and integration tests.

pub mod lyrics;
pub mod metrics;
pub mod resolver;

// ---- Re-exports for stable public API ----
pub use crate::lyrics::{LyricLine, LyricsPayload, TrackQuery};
pub use crate::resolver::config::ResolverConfig;
pub use crate::resolver::emptiness::Emptiness;
pub use crate::resolver::source::{FnSource, Source, SourceChain, Timeout};
pub use crate::resolver::types::{Attempt, Outcome, ProbeFailure, ResolutionResult};
pub use crate::resolver::FallbackResolver;

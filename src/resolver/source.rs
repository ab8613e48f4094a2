// src/resolver/source.rs
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::resolver::config::ResolverConfig;

/// One named candidate in a fallback search.
///
/// A probe either returns a value (which may still count as "nothing found")
/// or an error. The resolver decides what either means; sources only fetch.
#[async_trait]
pub trait Source<T: Send + 'static>: Send + Sync {
    fn name(&self) -> &str;
    async fn probe(&self) -> Result<T>;
}

#[async_trait]
impl<T: Send + 'static, S: Source<T> + ?Sized> Source<T> for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn probe(&self) -> Result<T> {
        (**self).probe().await
    }
}

#[async_trait]
impl<T: Send + 'static, S: Source<T> + ?Sized> Source<T> for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn probe(&self) -> Result<T> {
        (**self).probe().await
    }
}

/// Source backed by a closure that returns a future.
pub struct FnSource<F> {
    name: String,
    f: F,
}

#[async_trait]
impl<T, F, Fut> Source<T> for FnSource<F>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn probe(&self) -> Result<T> {
        (self.f)().await
    }
}

/// Wrap an async closure as a source.
pub fn from_fn<T, F, Fut>(name: impl Into<String>, f: F) -> FnSource<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    FnSource {
        name: name.into(),
        f,
    }
}

/// Wrap a blocking-free synchronous closure as a source.
pub fn from_sync_fn<T, G>(
    name: impl Into<String>,
    g: G,
) -> FnSource<impl Fn() -> std::future::Ready<Result<T>> + Send + Sync>
where
    T: Send + 'static,
    G: Fn() -> Result<T> + Send + Sync,
{
    from_fn(name, move || std::future::ready(g()))
}

/// Per-probe deadline layered on top of another source.
/// Expiry is reported as an ordinary probe error.
pub struct Timeout<S> {
    inner: S,
    limit: Duration,
}

impl<S> Timeout<S> {
    pub fn new(inner: S, limit: Duration) -> Self {
        Self { inner, limit }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

#[async_trait]
impl<T: Send + 'static, S: Source<T>> Source<T> for Timeout<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn probe(&self) -> Result<T> {
        match tokio::time::timeout(self.limit, self.inner.probe()).await {
            Ok(res) => res,
            Err(_) => Err(anyhow!("timed out after {}ms", self.limit.as_millis())),
        }
    }
}

/// Ordered, name-unique list of sources consumed by the resolver.
pub struct SourceChain<T: Send + 'static> {
    sources: Vec<Box<dyn Source<T>>>,
}

impl<T: Send + 'static> Default for SourceChain<T> {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
        }
    }
}

impl<T: Send + 'static> SourceChain<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source. Names identify sources, so a repeated name is rejected.
    pub fn push<S: Source<T> + 'static>(&mut self, source: S) -> Result<()> {
        self.push_boxed(Box::new(source))
    }

    pub fn push_boxed(&mut self, source: Box<dyn Source<T>>) -> Result<()> {
        if self.contains(source.name()) {
            bail!("duplicate source name: {}", source.name());
        }
        self.sources.push(source);
        Ok(())
    }

    /// Builder-style `push`.
    pub fn with<S: Source<T> + 'static>(mut self, source: S) -> Result<Self> {
        self.push(source)?;
        Ok(self)
    }

    /// Names are matched case-insensitively, like the config lists.
    pub fn contains(&self, name: &str) -> bool {
        self.sources.iter().any(|s| s.name().eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Source<T>> {
        self.sources.iter().map(|s| s.as_ref())
    }

    /// Arrange the host's available sources by configured priority.
    ///
    /// * Configured names come first, in configured order (case-insensitive match).
    /// * Registered sources the config does not mention follow in registration order.
    /// * Disabled sources are dropped; unknown configured names are logged and skipped.
    /// * A configured timeout wraps every remaining source.
    pub fn from_registry(
        registry: Vec<Box<dyn Source<T>>>,
        cfg: &ResolverConfig,
    ) -> Result<Self> {
        let mut pool: Vec<Option<Box<dyn Source<T>>>> = Vec::with_capacity(registry.len());
        for s in registry {
            if pool
                .iter()
                .flatten()
                .any(|p| p.name().eq_ignore_ascii_case(s.name()))
            {
                bail!("duplicate source name in registry: {}", s.name());
            }
            pool.push(Some(s));
        }

        let mut ordered: Vec<Box<dyn Source<T>>> = Vec::with_capacity(pool.len());
        for wanted in &cfg.order {
            let slot = pool.iter_mut().find(|slot| {
                slot.as_ref()
                    .is_some_and(|s| s.name().eq_ignore_ascii_case(wanted))
            });
            match slot.and_then(Option::take) {
                Some(s) => ordered.push(s),
                None => tracing::warn!(
                    target: "fallback",
                    source = wanted.as_str(),
                    "configured source is not registered; skipping"
                ),
            }
        }
        ordered.extend(pool.into_iter().flatten());

        let mut chain = Self::new();
        for s in ordered {
            if cfg.is_disabled(s.name()) {
                tracing::debug!(target: "fallback", source = s.name(), "source disabled by config");
                continue;
            }
            match cfg.probe_timeout() {
                Some(limit) => chain.push(Timeout::new(s, limit))?,
                None => chain.push_boxed(s)?,
            }
        }
        Ok(chain)
    }
}

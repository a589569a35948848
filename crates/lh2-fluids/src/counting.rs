//! Query-counting provider wrapper.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::FluidResult;
use crate::property::{InputPair, PropertyKind};
use crate::provider::PropertyProvider;
use crate::species::Species;

/// Wraps a provider and counts every `query` call that reaches it.
///
/// Helper methods on [`PropertyProvider`] funnel through `query`, so saturation lookups
/// are counted too.
#[derive(Debug, Default)]
pub struct CountingProvider<P> {
    inner: P,
    queries: AtomicUsize,
}

impl<P: PropertyProvider> CountingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            queries: AtomicUsize::new(0),
        }
    }

    /// Number of queries issued since construction or the last [`reset`](Self::reset).
    pub fn count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.queries.store(0, Ordering::Relaxed);
    }
}

impl<P: PropertyProvider> PropertyProvider for CountingProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn species(&self) -> Species {
        self.inner.species()
    }

    fn query(&self, input: InputPair, outputs: &[PropertyKind]) -> FluidResult<Vec<f64>> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.inner.query(input, outputs)
    }
}

//! Public resolution entry point

use crate::block::EffectiveConfig;
use crate::error::ResolutionError;
use crate::merge;
use crate::store::LayerStore;
use std::path::Path;

/// Resolves effective configurations against a sealed layer store.
///
/// Construction seals the store and takes ownership of it, so layers cannot
/// change once resolution begins. Resolution performs no I/O, mutates no
/// shared state, and allocates only call-local data; a `Resolver` can be
/// shared across threads freely.
#[derive(Debug, Clone)]
pub struct Resolver {
    store: LayerStore,
}

impl Resolver {
    pub fn new(mut store: LayerStore) -> Self {
        store.seal();
        Self { store }
    }

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    /// Compute the effective configuration for a file path.
    ///
    /// Results are computed on demand and never cached; caching is the
    /// caller's concern.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<EffectiveConfig, ResolutionError> {
        merge::fold(&self.store, path.as_ref())
    }
}

//! Per-run service bundle: recorder, recipe registry, and decay cache.

use std::sync::Arc;

use tracing::info;

use iso_core::error::{DecayError, PersistError, RecipeError};
use iso_core::traits::{DecaySolver, PersistenceSink};
use iso_core::{Basis, CompositionMap};
use iso_decay::DecayChainCache;
use iso_recipe::{RecipeBook, RecipeRegistry, Recorder, StateIdCounter};

use crate::handle::IsoVector;

/// Everything a simulation run shares across actors.
///
/// The registry and [`IsoContext::record`] log through the same recorder, so
/// recipe ids and ids assigned to later compositions come from one counter
/// and reach the sink in order.
#[derive(Debug)]
pub struct IsoContext {
    recorder: Arc<Recorder>,
    registry: RecipeRegistry,
    cache: DecayChainCache,
}

impl IsoContext {
    pub fn new(solver: Arc<dyn DecaySolver>, sink: Arc<dyn PersistenceSink>) -> Self {
        Self::with_counter(Arc::new(StateIdCounter::new()), solver, sink)
    }

    /// Context drawing state ids from a counter shared with other subsystems.
    pub fn with_counter(
        ids: Arc<StateIdCounter>,
        solver: Arc<dyn DecaySolver>,
        sink: Arc<dyn PersistenceSink>,
    ) -> Self {
        let recorder = Arc::new(Recorder::with_counter(ids, sink));
        Self {
            registry: RecipeRegistry::new(Arc::clone(&recorder)),
            cache: DecayChainCache::new(solver),
            recorder,
        }
    }

    pub fn recorder(&self) -> &Arc<Recorder> {
        &self.recorder
    }

    pub fn registry(&self) -> &RecipeRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &DecayChainCache {
        &self.cache
    }

    // --- setup ---

    pub fn load_recipe(
        &self,
        name: &str,
        fractions: CompositionMap,
        basis: Basis,
    ) -> Result<IsoVector, RecipeError> {
        Ok(IsoVector::from_composition(self.registry.load(name, fractions, basis)?))
    }

    pub fn load_book(&self, book: &RecipeBook) -> Result<usize, RecipeError> {
        let loaded = self.registry.load_book(book)?;
        info!(recipes = self.registry.count(), "recipe registry ready");
        Ok(loaded)
    }

    // --- per-step operations ---

    /// Handle sharing the recipe `name`.
    pub fn recipe(&self, name: &str) -> Result<IsoVector, RecipeError> {
        IsoVector::from_recipe(&self.registry, name)
    }

    /// Decay `vector` in place through the shared cache.
    pub fn decay(&self, vector: &mut IsoVector, elapsed_time: i64) -> Result<(), DecayError> {
        vector.decay(&self.cache, elapsed_time)
    }

    /// Log `vector`'s composition. Returns `true` if a new record was written.
    pub fn record(&self, vector: &IsoVector) -> Result<bool, PersistError> {
        vector.record(&self.recorder)
    }

    pub fn flush(&self) -> Result<(), PersistError> {
        self.recorder.flush()
    }
}

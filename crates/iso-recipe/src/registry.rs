//! Append-only registry of named recipes.
//!
//! Recipes are loaded once at setup, logged immediately through the shared
//! [`Recorder`], and never removed or replaced. Lookups hand out shared
//! references to the interned composition.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use iso_core::error::RecipeError;
use iso_core::{Basis, Composition, CompositionMap};

use crate::config::{RecipeBook, RecipeRecord};
use crate::recorder::Recorder;

/// Name → interned composition.
pub struct RecipeRegistry {
    recipes: RwLock<HashMap<String, Arc<Composition>>>,
    recorder: Arc<Recorder>,
}

impl RecipeRegistry {
    /// Empty registry logging through `recorder`.
    pub fn new(recorder: Arc<Recorder>) -> Self {
        Self {
            recipes: RwLock::new(HashMap::new()),
            recorder,
        }
    }

    /// Build, log, and store a recipe under `name`.
    ///
    /// Fails with [`RecipeError::DuplicateRecipe`] if the name is taken; the
    /// existing entry is left untouched and no state id is consumed.
    pub fn load(
        &self,
        name: &str,
        fractions: CompositionMap,
        basis: Basis,
    ) -> Result<Arc<Composition>, RecipeError> {
        let composition = Composition::new(fractions, basis)?;
        self.intern(name, composition)
    }

    /// Load a single configuration record.
    pub fn load_record(&self, record: &RecipeRecord) -> Result<Arc<Composition>, RecipeError> {
        let composition = record.composition()?;
        self.intern(&record.name, composition)
    }

    /// Load every record of `book` in order, stopping at the first failure.
    ///
    /// Returns the number of recipes loaded.
    pub fn load_book(&self, book: &RecipeBook) -> Result<usize, RecipeError> {
        for record in &book.recipes {
            self.load_record(record)?;
        }
        info!(count = book.recipes.len(), "loaded recipe book");
        Ok(book.recipes.len())
    }

    fn intern(&self, name: &str, composition: Composition) -> Result<Arc<Composition>, RecipeError> {
        let mut recipes = self.recipes.write();
        if recipes.contains_key(name) {
            return Err(RecipeError::DuplicateRecipe(name.to_string()));
        }
        let composition = Arc::new(composition);
        self.recorder.record(&composition)?;
        recipes.insert(name.to_string(), Arc::clone(&composition));
        debug!(name, state_id = composition.state_id(), "loaded recipe");
        Ok(composition)
    }

    /// The recipe registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<Arc<Composition>, RecipeError> {
        self.recipes
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| RecipeError::UnknownRecipe(name.to_string()))
    }

    /// Whether a recipe named `name` has been loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.recipes.read().contains_key(name)
    }

    pub fn count(&self) -> usize {
        self.recipes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Recipe names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.recipes.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// `(name, composition)` pairs sorted by state id, i.e. load order.
    pub fn entries(&self) -> Vec<(String, Arc<Composition>)> {
        let mut entries: Vec<(String, Arc<Composition>)> = self
            .recipes
            .read()
            .iter()
            .map(|(name, c)| (name.clone(), Arc::clone(c)))
            .collect();
        entries.sort_by_key(|(_, c)| c.state_id());
        entries
    }

    pub fn recorder(&self) -> &Arc<Recorder> {
        &self.recorder
    }
}

impl std::fmt::Debug for RecipeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeRegistry")
            .field("recipes", &self.names())
            .finish_non_exhaustive()
    }
}

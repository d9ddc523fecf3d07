//! Recipe configuration records.
//!
//! A recipe book is a JSON document:
//!
//! ```json
//! {
//!   "recipes": [
//!     { "name": "natural_uranium", "basis": "mass",
//!       "isotopes": [ { "id": 92235, "quantity": 0.0072 },
//!                     { "id": 92238, "quantity": 0.9928 } ] }
//!   ]
//! }
//! ```
//!
//! Isotope ids are kept as raw integers here; they are validated when the
//! record is turned into a composition.

use std::path::Path;

use serde::{Deserialize, Serialize};

use iso_core::error::{CompositionError, RecipeError};
use iso_core::{Basis, Composition};

/// One `(isotope id, quantity)` pair.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct IsotopeEntry {
    pub id: i64,
    pub quantity: f64,
}

/// A named recipe as read from configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RecipeRecord {
    pub name: String,
    /// Defaults to mass when omitted.
    #[serde(default)]
    pub basis: Basis,
    pub isotopes: Vec<IsotopeEntry>,
}

impl RecipeRecord {
    /// Validate and build the composition this record describes.
    pub fn composition(&self) -> Result<Composition, CompositionError> {
        Composition::from_raw(
            self.isotopes.iter().map(|e| (e.id, e.quantity)),
            self.basis,
        )
    }
}

/// An ordered collection of recipe records.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RecipeBook {
    #[serde(default)]
    pub recipes: Vec<RecipeRecord>,
}

impl RecipeBook {
    pub fn from_json_str(text: &str) -> Result<Self, RecipeError> {
        serde_json::from_str(text).map_err(|e| RecipeError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RecipeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RecipeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }
}

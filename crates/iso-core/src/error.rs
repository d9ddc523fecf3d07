//! Error types for compositions, recipes, decay, and persistence.
use thiserror::Error;

use crate::composition::StateId;
use crate::isotope::IsotopeId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompositionError {
    #[error("invalid isotope id: {0}")] InvalidIsotope(i64),
    #[error("negative quantity {value} for isotope {isotope}")] NegativeFraction { isotope: IsotopeId, value: f64 },
    #[error("non-finite quantity for isotope {isotope}")] NonFiniteFraction { isotope: IsotopeId },
    #[error("subtraction leaves isotope {isotope} short by {deficit}")] Range { isotope: IsotopeId, deficit: f64 },
    #[error("invalid scale factor: {0}")] InvalidScale(f64),
    #[error("composition {0} is logged and cannot change")] Frozen(StateId),
    #[error("invalid state id: {0}")] InvalidStateId(StateId),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecipeError {
    #[error("unknown recipe: {0}")] UnknownRecipe(String),
    #[error("duplicate recipe: {0}")] DuplicateRecipe(String),
    #[error("recipe config: {0}")] Config(String),
    #[error(transparent)] Composition(#[from] CompositionError),
    #[error(transparent)] Persist(#[from] PersistError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecayError {
    #[error("negative decay time: {0}")] NegativeTime(i64),
    #[error("decay solver failed: {0}")] Solver(String),
    #[error(transparent)] Composition(#[from] CompositionError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    #[error("sink: {0}")] Sink(String),
}

#[derive(Error, Debug)]
pub enum IsoError {
    #[error(transparent)] Composition(#[from] CompositionError),
    #[error(transparent)] Recipe(#[from] RecipeError),
    #[error(transparent)] Decay(#[from] DecayError),
    #[error(transparent)] Persist(#[from] PersistError),
}

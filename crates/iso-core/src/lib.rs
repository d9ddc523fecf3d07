//! # iso-core
//! Foundation types for isotopic compositions.
//!
//! - [`IsotopeId`]: `ZZZAAA` isotope identifiers with validation
//! - [`Composition`]: mass-basis composition with lazy normalizers and
//!   the arithmetic used by every higher layer
//! - [`traits`]: contracts for the external decay solver and persistence sink

pub mod composition;
pub mod constants;
pub mod error;
pub mod isotope;
pub mod traits;

pub use composition::{Composition, CompositionMap, StateId};
pub use isotope::{Basis, IsotopeId};

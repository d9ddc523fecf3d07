//! # iso-vector — Isotopic vector handles.
//!
//! [`IsoVector`] is the value type simulation actors hold. It wraps a shared,
//! immutable [`Composition`](iso_core::Composition):
//! - arithmetic yields new handles over new, unlogged compositions
//! - decay rebinds the handle to a cached daughter; other handles sharing the
//!   old composition are unaffected
//! - recording logs the wrapped composition once through the shared recorder
//!
//! [`IsoContext`] bundles the recorder, recipe registry, and decay cache a
//! simulation run needs. Build one per run (or per test).

pub mod context;
pub mod handle;

pub use context::IsoContext;
pub use handle::IsoVector;

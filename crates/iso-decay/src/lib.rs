//! # iso-decay — Memoized decay chains.
//!
//! - **Content keys**: compositions are identified by a BLAKE3 hash of their
//!   stored quantity map, so physically identical compositions share cache
//!   entries regardless of how they were reached.
//! - **Decay chain cache**: each distinct `(composition, elapsed time)` pair is
//!   solved at most once per cache; concurrent callers for the same key block
//!   on a single computation and observe the same daughter.
//! - **Reference solvers**: [`NoDecay`] and a first-order [`HalfLifeSolver`]
//!   stand in for a production nuclide solver.

pub mod cache;
pub mod key;
pub mod solver;

pub use cache::DecayChainCache;
pub use key::CompositionKey;
pub use solver::{HalfLifeSolver, HalfLifeTable, NoDecay};

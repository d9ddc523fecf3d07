//! Integration test suite for IsoVec.
//!
//! Exercises the composition, recipe, decay, and handle crates together, the
//! way a simulation run wires them.

pub mod helpers;

//! Shared fixtures for integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use iso_core::error::DecayError;
use iso_core::traits::DecaySolver;
use iso_core::{Basis, CompositionMap, IsotopeId};
use iso_decay::{HalfLifeSolver, HalfLifeTable};
use iso_recipe::MemorySink;
use iso_vector::IsoContext;

/// Wraps a solver and counts invocations.
pub struct CountingSolver<S> {
    inner: S,
    calls: AtomicUsize,
    delay: Duration,
}

impl<S: DecaySolver> CountingSolver<S> {
    pub fn new(inner: S) -> Self {
        Self::with_delay(inner, Duration::ZERO)
    }

    /// Sleep inside every solve to widen race windows.
    pub fn with_delay(inner: S, delay: Duration) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            delay,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<S: DecaySolver> DecaySolver for CountingSolver<S> {
    fn solve(&self, fractions: &CompositionMap, elapsed_time: i64) -> Result<CompositionMap, DecayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.inner.solve(fractions, elapsed_time)
    }
}

/// Shorthand for a validated isotope id.
pub fn iso(raw: i64) -> IsotopeId {
    IsotopeId::new(raw).expect("valid isotope id")
}

pub fn map(entries: &[(i64, f64)]) -> CompositionMap {
    entries.iter().map(|(raw, q)| (iso(*raw), *q)).collect()
}

/// Toy actinide chain: Pu-241 → Am-241 → Np-237, Cs-137 → Ba-137.
pub fn toy_solver() -> HalfLifeSolver {
    let table = HalfLifeTable::from_json_str(
        r#"{ "half_lives": [
            { "id": 94241, "half_life": 173.0, "daughter": 95241 },
            { "id": 95241, "half_life": 5196.0, "daughter": 93237 },
            { "id": 55137, "half_life": 361.0, "daughter": 56137 }
        ] }"#,
    )
    .expect("valid table");
    HalfLifeSolver::new(&table).expect("valid solver")
}

/// A run context over a counting toy solver and an in-memory sink, with
/// `natural_uranium` and `spent_fuel` recipes loaded.
pub fn loaded_context(
    delay: Duration,
) -> (IsoContext, Arc<CountingSolver<HalfLifeSolver>>, Arc<MemorySink>) {
    let solver = Arc::new(CountingSolver::with_delay(toy_solver(), delay));
    let sink = Arc::new(MemorySink::new());
    let ctx = IsoContext::new(solver.clone(), sink.clone());
    ctx.load_recipe(
        "natural_uranium",
        map(&[(92235, 0.0072), (92238, 0.9928)]),
        Basis::Mass,
    )
    .expect("load natural_uranium");
    ctx.load_recipe(
        "spent_fuel",
        map(&[
            (92235, 0.008),
            (92238, 0.94),
            (94239, 0.006),
            (94241, 0.002),
            (55137, 0.044),
        ]),
        Basis::Mass,
    )
    .expect("load spent_fuel");
    (ctx, solver, sink)
}

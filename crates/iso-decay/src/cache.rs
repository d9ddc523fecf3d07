//! Memoized parent → (elapsed time) → daughter mapping.
//!
//! Decay solves are expensive and many holders decay the same material by the
//! same amount, so each distinct `(mass fractions, elapsed time)` pair is
//! solved at most once and each daughter is shared by every caller.
//!
//! Layout:
//! - `solutions`: ([`CompositionKey::normalized`], elapsed time) → the
//!   solver's unit-mass result. Equal proportions at any magnitude share it.
//! - `chains`: [`CompositionKey::of`] → chain entry holding the canonical
//!   parent and its daughter slots. Daughters carry the parent's magnitude,
//!   so chains are keyed on absolute content.
//! - every slot is a mutex around an `Option`; the first caller for a key
//!   fills it while holding the lock, later callers block on it and then read
//!   the stored value. A daughter slot is always locked before a solution
//!   slot.
//!
//! Entries are append-only. A failed solve leaves the slot empty so the error
//! reaches the caller and a later call may retry.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use iso_core::error::DecayError;
use iso_core::traits::DecaySolver;
use iso_core::{Composition, CompositionMap};

use crate::key::CompositionKey;

type DaughterSlot = Arc<Mutex<Option<Arc<Composition>>>>;
type SolutionSlot = Arc<Mutex<Option<Arc<CompositionMap>>>>;

/// All cached decays of one parent.
struct DecayChain {
    /// Owned here so daughters' weak parent links stay valid for the run.
    parent: Arc<Composition>,
    daughters: DashMap<i64, DaughterSlot>,
}

/// Read-through cache of decay results.
pub struct DecayChainCache {
    solver: Arc<dyn DecaySolver>,
    chains: DashMap<CompositionKey, Arc<DecayChain>>,
    solutions: DashMap<(CompositionKey, i64), SolutionSlot>,
    solves: AtomicUsize,
}

impl DecayChainCache {
    pub fn new(solver: Arc<dyn DecaySolver>) -> Self {
        Self {
            solver,
            chains: DashMap::new(),
            solutions: DashMap::new(),
            solves: AtomicUsize::new(0),
        }
    }

    /// The daughter of `parent` after `elapsed_time`, solving only on the
    /// first request for this content and time.
    ///
    /// Zero elapsed time returns `parent` itself without touching the solver.
    /// The solver receives normalized mass fractions; its output is scaled
    /// back by the parent's total mass. A parent with the same proportions
    /// but a different mass reuses the solved fractions.
    ///
    /// Chains are shared by content, so the daughter's [`Composition::parent`]
    /// is the first equal-content composition decayed by this cache. It may be
    /// an unlogged copy rather than the caller's `parent`.
    pub fn get_or_compute_daughter(
        &self,
        parent: &Arc<Composition>,
        elapsed_time: i64,
    ) -> Result<Arc<Composition>, DecayError> {
        if elapsed_time < 0 {
            return Err(DecayError::NegativeTime(elapsed_time));
        }
        if elapsed_time == 0 {
            return Ok(Arc::clone(parent));
        }

        let key = CompositionKey::of(parent);
        let chain = Arc::clone(
            self.chains
                .entry(key)
                .or_insert_with(|| {
                    Arc::new(DecayChain {
                        parent: Arc::clone(parent),
                        daughters: DashMap::new(),
                    })
                })
                .value(),
        );
        let slot = Arc::clone(chain.daughters.entry(elapsed_time).or_default().value());

        let mut daughter = slot.lock();
        if let Some(existing) = daughter.as_ref() {
            trace!(%key, elapsed_time, "decay cache hit");
            return Ok(Arc::clone(existing));
        }

        let solved = self.solve_unit(&chain.parent, elapsed_time)?;
        let computed = Arc::new(Composition::daughter_of(
            &chain.parent,
            rescale(&solved, chain.parent.total_mass()),
            elapsed_time,
        )?);
        *daughter = Some(Arc::clone(&computed));
        Ok(computed)
    }

    /// Elapsed times already solved for `parent`'s content.
    pub fn decay_times(&self, parent: &Composition) -> BTreeSet<i64> {
        self.daughters(parent).into_keys().collect()
    }

    /// Solved daughters of `parent`'s content, keyed by elapsed time.
    pub fn daughters(&self, parent: &Composition) -> BTreeMap<i64, Arc<Composition>> {
        let Some(chain) = self.chain(parent) else {
            return BTreeMap::new();
        };
        let slots: Vec<(i64, DaughterSlot)> = chain
            .daughters
            .iter()
            .map(|e| (*e.key(), Arc::clone(e.value())))
            .collect();
        slots
            .into_iter()
            .filter_map(|(t, slot)| slot.lock().as_ref().map(|d| (t, Arc::clone(d))))
            .collect()
    }

    /// The cached daughter for `(parent, elapsed_time)`, without solving.
    pub fn daughter(&self, parent: &Composition, elapsed_time: i64) -> Option<Arc<Composition>> {
        let chain = self.chain(parent)?;
        let slot = Arc::clone(chain.daughters.get(&elapsed_time)?.value());
        let cached = slot.lock().clone();
        cached
    }

    /// Whether `(parent, elapsed_time)` has been solved.
    pub fn contains(&self, parent: &Composition, elapsed_time: i64) -> bool {
        self.daughter(parent, elapsed_time).is_some()
    }

    /// Number of distinct parents with at least one cache entry.
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Number of successful solver invocations.
    pub fn solve_count(&self) -> usize {
        self.solves.load(Ordering::Relaxed)
    }

    /// Unit-mass decay of `parent`'s mass fractions, solved once per
    /// `(fractions, elapsed_time)`.
    fn solve_unit(
        &self,
        parent: &Composition,
        elapsed_time: i64,
    ) -> Result<Arc<CompositionMap>, DecayError> {
        let fractions = parent.mass_fractions();
        let key = CompositionKey::of_map(&fractions);
        let slot = Arc::clone(self.solutions.entry((key, elapsed_time)).or_default().value());

        let mut solution = slot.lock();
        if let Some(existing) = solution.as_ref() {
            trace!(%key, elapsed_time, "reusing solved fractions");
            return Ok(Arc::clone(existing));
        }

        debug!(%key, elapsed_time, "solving decay");
        let solved = Arc::new(self.solver.solve(&fractions, elapsed_time)?);
        self.solves.fetch_add(1, Ordering::Relaxed);
        *solution = Some(Arc::clone(&solved));
        Ok(solved)
    }

    fn chain(&self, parent: &Composition) -> Option<Arc<DecayChain>> {
        self.chains
            .get(&CompositionKey::of(parent))
            .map(|e| Arc::clone(e.value()))
    }
}

impl std::fmt::Debug for DecayChainCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecayChainCache")
            .field("chains", &self.chain_count())
            .field("solves", &self.solve_count())
            .finish_non_exhaustive()
    }
}

/// Scale a solver result from unit mass back to the parent's mass.
fn rescale(solved: &CompositionMap, total: f64) -> CompositionMap {
    solved.iter().map(|(id, q)| (*id, q * total)).collect()
}

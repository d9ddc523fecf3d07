//! Reference decay solvers.
//!
//! Production runs plug a full nuclide solver in through
//! [`DecaySolver`]. The solvers here are deterministic stand-ins: [`NoDecay`]
//! leaves compositions untouched, [`HalfLifeSolver`] applies first-order
//! exponential decay with single-step daughter feeding. Neither aims for
//! physical accuracy.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use iso_core::error::DecayError;
use iso_core::traits::DecaySolver;
use iso_core::{CompositionMap, IsotopeId};

/// Solver for stable material: returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDecay;

impl DecaySolver for NoDecay {
    fn solve(&self, fractions: &CompositionMap, _elapsed_time: i64) -> Result<CompositionMap, DecayError> {
        Ok(fractions.clone())
    }
}

/// One radioactive isotope: half-life in simulation time steps and the
/// isotope its decayed mass feeds, if tracked.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct HalfLifeEntry {
    pub id: IsotopeId,
    pub half_life: f64,
    #[serde(default)]
    pub daughter: Option<IsotopeId>,
}

/// Serde document listing half-lives.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct HalfLifeTable {
    #[serde(default)]
    pub half_lives: Vec<HalfLifeEntry>,
}

impl HalfLifeTable {
    pub fn from_json_str(text: &str) -> Result<Self, DecayError> {
        serde_json::from_str(text).map_err(|e| DecayError::Solver(format!("half-life table: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DecayError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DecayError::Solver(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }
}

/// First-order decay: `N(t) = N0 * 2^(-t / T½)`.
///
/// Isotopes are processed once each, in descending id order. Mass removed from
/// an isotope is added to its daughter; a daughter that is itself radioactive
/// decays only if it is processed later in the pass.
#[derive(Debug, Clone, Default)]
pub struct HalfLifeSolver {
    /// Keyed by isotope, iterated in reverse.
    entries: BTreeMap<IsotopeId, HalfLifeEntry>,
}

impl HalfLifeSolver {
    pub fn new(table: &HalfLifeTable) -> Result<Self, DecayError> {
        let mut entries = BTreeMap::new();
        for entry in &table.half_lives {
            if !entry.half_life.is_finite() || entry.half_life <= 0.0 {
                return Err(DecayError::Solver(format!(
                    "half-life of {} must be positive, got {}",
                    entry.id, entry.half_life
                )));
            }
            if entries.insert(entry.id, *entry).is_some() {
                return Err(DecayError::Solver(format!("duplicate half-life for {}", entry.id)));
            }
        }
        Ok(Self { entries })
    }

    /// Number of radioactive isotopes known to the solver.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DecaySolver for HalfLifeSolver {
    fn solve(&self, fractions: &CompositionMap, elapsed_time: i64) -> Result<CompositionMap, DecayError> {
        if elapsed_time < 0 {
            return Err(DecayError::NegativeTime(elapsed_time));
        }
        let mut out = fractions.clone();
        for (id, entry) in self.entries.iter().rev() {
            let Some(q) = out.get(id).copied() else {
                continue;
            };
            let remaining = q * (-(elapsed_time as f64) / entry.half_life).exp2();
            out.insert(*id, remaining);
            if let Some(daughter) = entry.daughter {
                *out.entry(daughter).or_insert(0.0) += q - remaining;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso(raw: i64) -> IsotopeId {
        IsotopeId::new(raw).unwrap()
    }

    fn map(entries: &[(i64, f64)]) -> CompositionMap {
        entries.iter().map(|(r, q)| (iso(*r), *q)).collect()
    }

    fn pu241_solver() -> HalfLifeSolver {
        // Pu-241 -> Am-241, half-life 12 steps for round numbers.
        let table = HalfLifeTable::from_json_str(
            r#"{ "half_lives": [ { "id": 94241, "half_life": 12.0, "daughter": 95241 } ] }"#,
        )
        .unwrap();
        HalfLifeSolver::new(&table).unwrap()
    }

    // --- NoDecay ---

    #[test]
    fn no_decay_is_identity() {
        let input = map(&[(92235, 0.3), (92238, 0.7)]);
        assert_eq!(NoDecay.solve(&input, 1_000).unwrap(), input);
    }

    // --- HalfLifeSolver ---

    #[test]
    fn one_half_life_halves() {
        let out = pu241_solver().solve(&map(&[(94241, 1.0)]), 12).unwrap();
        assert!((out[&iso(94241)] - 0.5).abs() < 1e-15);
        assert!((out[&iso(95241)] - 0.5).abs() < 1e-15);
    }

    #[test]
    fn conserves_mass_with_daughter() {
        let input = map(&[(94241, 0.2), (94239, 0.8)]);
        let out = pu241_solver().solve(&input, 37).unwrap();
        let total: f64 = out.values().sum();
        assert!((total - 1.0).abs() < 1e-14);
        assert_eq!(out[&iso(94239)], 0.8);
    }

    #[test]
    fn zero_time_is_identity() {
        let input = map(&[(94241, 0.2), (94239, 0.8)]);
        let out = pu241_solver().solve(&input, 0).unwrap();
        assert_eq!(out[&iso(94241)], 0.2);
        assert_eq!(out[&iso(95241)], 0.0);
    }

    #[test]
    fn absent_isotopes_untouched() {
        let input = map(&[(92238, 1.0)]);
        assert_eq!(pu241_solver().solve(&input, 100).unwrap(), input);
    }

    #[test]
    fn negative_time_rejected() {
        let err = pu241_solver().solve(&map(&[(94241, 1.0)]), -1).unwrap_err();
        assert_eq!(err, DecayError::NegativeTime(-1));
    }

    #[test]
    fn terminal_decay_without_daughter_loses_mass() {
        let table = HalfLifeTable {
            half_lives: vec![HalfLifeEntry { id: iso(1003), half_life: 1.0, daughter: None }],
        };
        let out = HalfLifeSolver::new(&table).unwrap().solve(&map(&[(1003, 1.0)]), 2).unwrap();
        assert!((out[&iso(1003)] - 0.25).abs() < 1e-15);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn invalid_tables_rejected() {
        let zero = HalfLifeTable {
            half_lives: vec![HalfLifeEntry { id: iso(1003), half_life: 0.0, daughter: None }],
        };
        assert!(HalfLifeSolver::new(&zero).is_err());

        let entry = HalfLifeEntry { id: iso(1003), half_life: 1.0, daughter: None };
        let dup = HalfLifeTable { half_lives: vec![entry, entry] };
        assert!(HalfLifeSolver::new(&dup).is_err());

        assert!(HalfLifeTable::from_json_str(r#"{ "half_lives": [ { "id": 7, "half_life": 1 } ] }"#).is_err());
    }

    #[test]
    fn solver_is_object_safe() {
        let s = pu241_solver();
        let dyn_s: &dyn DecaySolver = &s;
        assert_eq!(dyn_s.solve(&CompositionMap::new(), 5).unwrap().len(), 0);
    }
}

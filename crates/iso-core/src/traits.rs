//! Trait interfaces for external collaborators.
//!
//! These traits define the seams between the composition engine and the
//! outside world:
//! - [`DecaySolver`]: the numeric decay capability (iso-decay ships reference
//!   implementations)
//! - [`PersistenceSink`]: where logged compositions are written (iso-recipe
//!   ships in-memory and JSON-lines sinks)

use serde::{Deserialize, Serialize};

use crate::composition::{CompositionMap, StateId};
use crate::error::{DecayError, PersistError};
use crate::isotope::IsotopeId;

/// Pure decay computation over a normalized mass-fraction map.
///
/// Implementations must be deterministic: identical inputs always yield
/// identical outputs. The decay cache relies on this to compute each
/// `(composition, elapsed_time)` pair at most once.
pub trait DecaySolver: Send + Sync {
    /// Decay `fractions` for `elapsed_time` time steps and return the
    /// resulting mass-basis map.
    fn solve(&self, fractions: &CompositionMap, elapsed_time: i64)
        -> Result<CompositionMap, DecayError>;
}

/// One persisted row: a single isotope of a logged composition.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StateRecord {
    /// State id of the logged composition.
    pub state_id: StateId,
    /// Isotope of this row.
    pub isotope: IsotopeId,
    /// Normalized mass fraction.
    pub fraction: f64,
}

/// Destination for logged compositions.
///
/// The recorder calls [`write`](Self::write) once per newly logged
/// composition, in increasing state id order.
pub trait PersistenceSink: Send + Sync {
    /// Persist all rows of one composition.
    fn write(&self, rows: &[StateRecord]) -> Result<(), PersistError>;

    /// Flush buffered rows. Default implementation does nothing.
    fn flush(&self) -> Result<(), PersistError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Doubling;

    impl DecaySolver for Doubling {
        fn solve(
            &self,
            fractions: &CompositionMap,
            _elapsed_time: i64,
        ) -> Result<CompositionMap, DecayError> {
            Ok(fractions.iter().map(|(id, q)| (*id, q * 2.0)).collect())
        }
    }

    #[derive(Default)]
    struct VecSink(Mutex<Vec<StateRecord>>);

    impl PersistenceSink for VecSink {
        fn write(&self, rows: &[StateRecord]) -> Result<(), PersistError> {
            self.0.lock().unwrap().extend_from_slice(rows);
            Ok(())
        }
    }

    #[test]
    fn solver_is_object_safe() {
        let solver: &dyn DecaySolver = &Doubling;
        let mut map = CompositionMap::new();
        map.insert(IsotopeId::new(92235).unwrap(), 0.5);
        let out = solver.solve(&map, 1).unwrap();
        assert_eq!(out.values().copied().collect::<Vec<_>>(), vec![1.0]);
    }

    #[test]
    fn sink_default_flush_is_ok() {
        let sink = VecSink::default();
        let dyn_sink: &dyn PersistenceSink = &sink;
        let row = StateRecord {
            state_id: 1,
            isotope: IsotopeId::new(1001).unwrap(),
            fraction: 1.0,
        };
        dyn_sink.write(std::slice::from_ref(&row)).unwrap();
        assert!(dyn_sink.flush().is_ok());
        assert_eq!(sink.0.lock().unwrap().as_slice(), &[row]);
    }

    #[test]
    fn state_record_serializes_flat() {
        let row = StateRecord {
            state_id: 4,
            isotope: IsotopeId::new(92235).unwrap(),
            fraction: 0.5,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"state_id":4,"isotope":92235,"fraction":0.5}"#);
    }
}

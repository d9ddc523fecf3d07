//! The single funnel for assigning state ids and persisting compositions.
//!
//! Every logged composition passes through [`Recorder::record`]. The recorder
//! serializes id assignment and the sink write under one lock, so:
//! - a composition is written at most once, even under concurrent callers
//! - the sink receives compositions in increasing state id order

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use iso_core::Composition;
use iso_core::error::PersistError;
use iso_core::traits::{PersistenceSink, StateRecord};

use crate::ids::StateIdCounter;
use crate::sink::NullSink;

/// Assigns state ids and forwards newly logged compositions to a sink.
pub struct Recorder {
    ids: Arc<StateIdCounter>,
    sink: Arc<dyn PersistenceSink>,
    funnel: Mutex<()>,
}

impl Recorder {
    /// Recorder with a fresh id counter.
    pub fn new(sink: Arc<dyn PersistenceSink>) -> Self {
        Self::with_counter(Arc::new(StateIdCounter::new()), sink)
    }

    /// Recorder sharing an existing id counter with other consumers.
    pub fn with_counter(ids: Arc<StateIdCounter>, sink: Arc<dyn PersistenceSink>) -> Self {
        Self {
            ids,
            sink,
            funnel: Mutex::new(()),
        }
    }

    /// Recorder that assigns ids but persists nothing.
    pub fn detached() -> Self {
        Self::new(Arc::new(NullSink))
    }

    /// The shared id counter.
    pub fn ids(&self) -> &Arc<StateIdCounter> {
        &self.ids
    }

    /// Log `composition` if it is not logged yet.
    ///
    /// Returns `Ok(true)` when a new id was assigned and the rows were written,
    /// `Ok(false)` when the composition was already logged. If the sink fails
    /// the composition stays unlogged and the consumed id is never reused.
    pub fn record(&self, composition: &Composition) -> Result<bool, PersistError> {
        if composition.is_logged() {
            return Ok(false);
        }
        let _funnel = self.funnel.lock();
        if composition.is_logged() {
            return Ok(false);
        }

        let state_id = self.ids.next_id();
        let rows: Vec<StateRecord> = composition
            .mass_fractions()
            .into_iter()
            .map(|(isotope, fraction)| StateRecord {
                state_id,
                isotope,
                fraction,
            })
            .collect();
        self.sink.write(&rows)?;

        if let Err(e) = composition.set_state_id(state_id) {
            warn!(state_id, "composition logged outside the recorder: {e}");
            return Ok(false);
        }
        debug!(state_id, isotopes = rows.len(), "recorded composition");
        Ok(true)
    }

    /// Flush the underlying sink.
    pub fn flush(&self) -> Result<(), PersistError> {
        self.sink.flush()
    }
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder").field("ids", &self.ids).finish_non_exhaustive()
    }
}

//! Persistence sinks for logged compositions.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use parking_lot::Mutex;

use iso_core::StateId;
use iso_core::error::PersistError;
use iso_core::traits::{PersistenceSink, StateRecord};

/// Discards every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PersistenceSink for NullSink {
    fn write(&self, _rows: &[StateRecord]) -> Result<(), PersistError> {
        Ok(())
    }
}

/// Keeps every row in memory, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: Mutex<Vec<StateRecord>>,
    writes: Mutex<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all rows written so far.
    pub fn rows(&self) -> Vec<StateRecord> {
        self.rows.lock().clone()
    }

    /// Distinct state ids in write order.
    pub fn state_ids(&self) -> Vec<StateId> {
        let mut ids: Vec<StateId> = Vec::new();
        for row in self.rows.lock().iter() {
            if ids.last() != Some(&row.state_id) {
                ids.push(row.state_id);
            }
        }
        ids
    }

    /// Number of `write` calls received.
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

impl PersistenceSink for MemorySink {
    fn write(&self, rows: &[StateRecord]) -> Result<(), PersistError> {
        self.rows.lock().extend_from_slice(rows);
        *self.writes.lock() += 1;
        Ok(())
    }
}

/// Writes one JSON object per row, newline-delimited.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<BufWriter<W>>,
}

impl JsonLinesSink<File> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let file = File::create(path.as_ref())
            .map_err(|e| PersistError::Sink(format!("{}: {e}", path.as_ref().display())))?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
        }
    }

    /// Flush and return the inner writer.
    pub fn into_inner(self) -> Result<W, PersistError> {
        self.writer
            .into_inner()
            .into_inner()
            .map_err(|e| PersistError::Sink(e.to_string()))
    }
}

impl<W: Write + Send> PersistenceSink for JsonLinesSink<W> {
    fn write(&self, rows: &[StateRecord]) -> Result<(), PersistError> {
        let mut writer = self.writer.lock();
        for row in rows {
            serde_json::to_writer(&mut *writer, row).map_err(|e| PersistError::Sink(e.to_string()))?;
            writer
                .write_all(b"\n")
                .map_err(|e| PersistError::Sink(e.to_string()))?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), PersistError> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| PersistError::Sink(e.to_string()))
    }
}

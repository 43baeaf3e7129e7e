//! In-process appointment store.
//!
//! Keeps raw storage lines instead of decoded records so that load
//! behaviour (blank lines, corrupted lines) matches the file store exactly.

use crate::model::appointment::Appointment;
use crate::repo::appointment_repo::{
    decode_lines, log_load_outcome, AppointmentStore, LoadOutcome, RepoResult,
};
use std::cell::RefCell;
use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

const MEMORY_SOURCE: &str = ":memory:";

/// Store backed by a line buffer; never fails on write.
#[derive(Debug, Default)]
pub struct MemoryAppointmentStore {
    lines: RefCell<Vec<String>>,
}

impl MemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw storage lines, as if read from a file.
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: RefCell::new(lines.into_iter().map(Into::into).collect()),
        }
    }

    /// Returns a snapshot of the raw stored lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl AppointmentStore for MemoryAppointmentStore {
    fn ensure_initialized(&self) -> RepoResult<()> {
        Ok(())
    }

    fn load_all(&self) -> LoadOutcome {
        let started_at = Instant::now();
        let mut outcome = LoadOutcome::default();
        let joined = self.lines.borrow().join("\n");
        decode_lines(
            Cursor::new(joined.as_bytes()),
            Path::new(MEMORY_SOURCE),
            &mut outcome,
        );
        log_load_outcome(&outcome, started_at);
        outcome
    }

    fn append(&self, record: &Appointment) -> RepoResult<()> {
        self.lines.borrow_mut().push(record.encode());
        Ok(())
    }

    fn replace_all(&self, records: &[Appointment]) -> RepoResult<()> {
        *self.lines.borrow_mut() = records.iter().map(Appointment::encode).collect();
        Ok(())
    }
}

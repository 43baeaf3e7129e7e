//! Appointment store contract and flat-file implementation.
//!
//! # Responsibility
//! - Load the full record set, append one record, replace the full set.
//! - Keep file layout details (one encoded record per line) inside core.
//!
//! # Invariants
//! - File handles are opened and released within a single call.
//! - `append` never rewrites existing content.
//! - After a successful `replace_all`, file content is exactly the encoding
//!   of the given sequence.
//! - `replace_all` truncates in place; a failed call can leave the file
//!   partially written and callers must re-check with `load_all`.

use crate::config::StoreConfig;
use crate::model::appointment::{Appointment, MalformedRecord};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage failure raised by store write paths.
#[derive(Debug)]
pub enum RepoError {
    Io {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },
}

impl RepoError {
    pub(crate) fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { op, path, source } => {
                write!(f, "store {op} failed for `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Problem met while loading; recorded instead of aborting the load.
#[derive(Debug)]
pub enum LoadIssue {
    /// Line `line_number` (1-based) could not be decoded and was skipped.
    Malformed {
        line_number: usize,
        error: MalformedRecord,
    },
    /// Line `line_number` (1-based) is not valid UTF-8 and was skipped.
    InvalidUtf8 { line_number: usize },
    /// Reading stopped early; records decoded before the failure are kept.
    Io(RepoError),
}

impl Display for LoadIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed { line_number, error } => write!(f, "line {line_number}: {error}"),
            Self::InvalidUtf8 { line_number } => write!(f, "line {line_number}: invalid UTF-8"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

/// Result of a full load: every decodable record plus what went wrong.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Decoded records in file (insertion) order.
    pub records: Vec<Appointment>,
    pub issues: Vec<LoadIssue>,
}

impl LoadOutcome {
    /// Returns whether the load finished without skipped lines or I/O errors.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Drops the issue list, keeping the records.
    pub fn into_records(self) -> Vec<Appointment> {
        self.records
    }

    /// Returns the records only when the whole file was read.
    ///
    /// Skipped lines are fine; a read that stopped early is not, since
    /// rewriting from it would erase every record after the failure.
    ///
    /// # Errors
    /// - The first `LoadIssue::Io` recorded during the load.
    pub fn into_complete_records(self) -> RepoResult<Vec<Appointment>> {
        for issue in self.issues {
            if let LoadIssue::Io(err) = issue {
                return Err(err);
            }
        }
        Ok(self.records)
    }
}

/// Record-set storage used by the scheduling service.
pub trait AppointmentStore {
    /// Makes sure the backing storage exists without truncating it.
    fn ensure_initialized(&self) -> RepoResult<()>;
    /// Reads every record in insertion order, skipping corrupted lines.
    fn load_all(&self) -> LoadOutcome;
    /// Adds one record at the end of the set.
    fn append(&self, record: &Appointment) -> RepoResult<()>;
    /// Replaces the whole set with `records`, in the given order.
    fn replace_all(&self, records: &[Appointment]) -> RepoResult<()>;
}

/// Flat-file store: one encoded appointment per line, UTF-8.
#[derive(Debug, Clone)]
pub struct FileAppointmentStore {
    path: PathBuf,
}

impl FileAppointmentStore {
    /// Creates a store bound to `config.file_path()`.
    ///
    /// No file-system access happens until the first operation.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            path: config.file_path(),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AppointmentStore for FileAppointmentStore {
    fn ensure_initialized(&self) -> RepoResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|err| RepoError::io("create_dir", parent, err))?;
            }
        }

        // Opening with `create` + `append` never truncates existing content.
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| RepoError::io("create_file", &self.path, err))?;
        Ok(())
    }

    fn load_all(&self) -> LoadOutcome {
        let started_at = Instant::now();
        let mut outcome = LoadOutcome::default();

        if let Err(err) = self.ensure_initialized() {
            error!(
                "event=store_load module=repo status=error duration_ms={} error_code=store_init_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            outcome.issues.push(LoadIssue::Io(err));
            return outcome;
        }

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) => {
                let err = RepoError::io("open", &self.path, err);
                error!(
                    "event=store_load module=repo status=error duration_ms={} error_code=store_open_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                outcome.issues.push(LoadIssue::Io(err));
                return outcome;
            }
        };

        decode_lines(BufReader::new(file), &self.path, &mut outcome);
        log_load_outcome(&outcome, started_at);
        outcome
    }

    fn append(&self, record: &Appointment) -> RepoResult<()> {
        self.ensure_initialized()?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|err| RepoError::io("append", &self.path, err))?;
        writeln!(file, "{}", record.encode())
            .map_err(|err| RepoError::io("append", &self.path, err))?;

        info!(
            "event=store_append module=repo status=ok id={}",
            record.id
        );
        Ok(())
    }

    fn replace_all(&self, records: &[Appointment]) -> RepoResult<()> {
        let started_at = Instant::now();
        self.ensure_initialized()?;

        let result = write_all_records(&self.path, records);
        match &result {
            Ok(()) => info!(
                "event=store_replace module=repo status=ok count={} duration_ms={}",
                records.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_replace module=repo status=error count={} duration_ms={} error_code=store_rewrite_failed error={}",
                records.len(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

fn write_all_records(path: &Path, records: &[Appointment]) -> RepoResult<()> {
    let file = File::create(path).map_err(|err| RepoError::io("truncate", path, err))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        writeln!(writer, "{}", record.encode())
            .map_err(|err| RepoError::io("rewrite", path, err))?;
    }
    writer
        .flush()
        .map_err(|err| RepoError::io("rewrite", path, err))
}

/// Decodes every non-blank line of `reader` into `outcome`.
///
/// Lines are read as raw bytes so one undecodable line (bad UTF-8 or fewer
/// than five fields) is recorded and skipped without hiding later lines.
/// Only a failing read stops decoding; records decoded before it are kept.
pub(crate) fn decode_lines<R: BufRead>(mut reader: R, source: &Path, outcome: &mut LoadOutcome) {
    let mut buf = Vec::new();
    let mut line_number = 0;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return,
            Ok(_) => line_number += 1,
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error line={} error_code=store_read_failed error={}",
                    line_number + 1,
                    err
                );
                outcome
                    .issues
                    .push(LoadIssue::Io(RepoError::io("read", source, err)));
                return;
            }
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(_) => {
                warn!(
                    "event=store_load module=repo status=warn line={} error_code=invalid_utf8",
                    line_number
                );
                outcome.issues.push(LoadIssue::InvalidUtf8 { line_number });
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match Appointment::decode(line) {
            Ok(record) => outcome.records.push(record),
            Err(error) => {
                warn!(
                    "event=store_load module=repo status=warn line={} error_code=malformed_record fields={}",
                    line_number, error.fields
                );
                outcome.issues.push(LoadIssue::Malformed { line_number, error });
            }
        }
    }
}

pub(crate) fn log_load_outcome(outcome: &LoadOutcome, started_at: Instant) {
    if outcome.is_clean() {
        info!(
            "event=store_load module=repo status=ok count={} duration_ms={}",
            outcome.records.len(),
            started_at.elapsed().as_millis()
        );
    } else {
        warn!(
            "event=store_load module=repo status=partial count={} issues={} duration_ms={}",
            outcome.records.len(),
            outcome.issues.len(),
            started_at.elapsed().as_millis()
        );
    }
}

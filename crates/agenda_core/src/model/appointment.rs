//! Appointment record and its delimited line format.
//!
//! # Responsibility
//! - Define the five-field appointment record.
//! - Encode/decode one storage line per record.
//!
//! # Invariants
//! - Field order on disk is `id, patient_name, doctor_name, date, time`.
//! - Encoded lines never carry a trailing delimiter or newline.
//! - Values are not escaped; a value containing `,` corrupts its line.

use crate::config::FieldPolicy;
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Single-character separator between persisted fields.
pub const FIELD_DELIMITER: char = ',';

const FIELD_COUNT: usize = 5;

/// Canonical appointment identifier (`Cons01`, `Cons02`, ...).
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type AppointmentId = String;

/// One scheduled medical appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Canonical id, unique across the record set.
    pub id: AppointmentId,
    pub patient_name: String,
    pub doctor_name: String,
    /// ISO `YYYY-MM-DD`. Display conversion belongs to the caller.
    pub date: String,
    /// Free-form `HH:MM`.
    pub time: String,
}

impl Appointment {
    pub fn new(
        id: impl Into<AppointmentId>,
        patient_name: impl Into<String>,
        doctor_name: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            patient_name: patient_name.into(),
            doctor_name: doctor_name.into(),
            date: date.into(),
            time: time.into(),
        }
    }

    /// Serializes this record into its storage line (without newline).
    pub fn encode(&self) -> String {
        format!(
            "{}{d}{}{d}{}{d}{}{d}{}",
            self.id,
            self.patient_name,
            self.doctor_name,
            self.date,
            self.time,
            d = FIELD_DELIMITER
        )
    }

    /// Parses one storage line.
    ///
    /// Surrounding whitespace and line terminators are ignored. Fields
    /// beyond the fifth are dropped.
    ///
    /// # Errors
    /// - `MalformedRecord` when the line has fewer than five fields.
    pub fn decode(line: &str) -> Result<Self, MalformedRecord> {
        let line = line.trim();
        let parts: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if parts.len() < FIELD_COUNT {
            return Err(MalformedRecord {
                fields: parts.len(),
                line: line.to_string(),
            });
        }

        Ok(Self::new(parts[0], parts[1], parts[2], parts[3], parts[4]))
    }
}

/// A storage line that does not carry all five fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// Number of delimited fields actually found.
    pub fields: usize,
    /// Offending line content, trimmed. Kept out of `Display` since it
    /// carries patient data.
    pub line: String,
}

impl Display for MalformedRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "malformed record: expected {FIELD_COUNT} fields, found {}",
            self.fields
        )
    }
}

impl Error for MalformedRecord {}

/// Field value rejected before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Value would split the record across lines.
    EmbeddedNewline { field: &'static str },
    /// Value contains the field delimiter under `FieldPolicy::Strict`.
    ContainsDelimiter { field: &'static str },
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmbeddedNewline { field } => {
                write!(f, "field `{field}` must not contain a line break")
            }
            Self::ContainsDelimiter { field } => write!(
                f,
                "field `{field}` must not contain the delimiter `{FIELD_DELIMITER}`"
            ),
        }
    }
}

impl Error for FieldError {}

/// Checks one user-supplied value against the field policy.
///
/// Line breaks are rejected under every policy. A delimiter is rejected
/// under `Strict` and only logged under `Permissive`.
pub fn validate_field(
    field: &'static str,
    value: &str,
    policy: FieldPolicy,
) -> Result<(), FieldError> {
    if value.contains(['\n', '\r']) {
        return Err(FieldError::EmbeddedNewline { field });
    }

    if value.contains(FIELD_DELIMITER) {
        match policy {
            FieldPolicy::Strict => return Err(FieldError::ContainsDelimiter { field }),
            FieldPolicy::Permissive => {
                warn!(
                    "event=field_validate module=model status=warn field={} reason=contains_delimiter",
                    field
                );
            }
        }
    }

    Ok(())
}

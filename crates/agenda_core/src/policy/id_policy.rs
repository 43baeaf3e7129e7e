//! Sequential `ConsNN` identifier policy.
//!
//! # Responsibility
//! - Provide the pluggable next-id contract used by the scheduling service.
//! - Normalize user-supplied identifier strings.
//!
//! # Invariants
//! - An empty record set always yields `Cons01`.
//! - Padding is a minimum width; `Cons100` follows `Cons99`.

use crate::model::appointment::{Appointment, AppointmentId};
use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed prefix of every canonical identifier.
pub const ID_PREFIX: &str = "Cons";

static DIGIT_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digit run regex"));

/// Strategy that picks the id for the next created appointment.
pub trait IdPolicy {
    fn next_id(&self, existing: &[Appointment]) -> AppointmentId;
}

/// Derives the next id from the last record in insertion order.
///
/// After deleting the newest record, the next create re-derives from the
/// new last record, so an id can come back. See DESIGN.md for the open
/// question around this.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastRecordIdPolicy;

impl IdPolicy for LastRecordIdPolicy {
    fn next_id(&self, existing: &[Appointment]) -> AppointmentId {
        let Some(last) = existing.last() else {
            return format_id(1);
        };

        match embedded_number(&last.id).and_then(|number| number.checked_add(1)) {
            Some(next) => format_id(next),
            None => fallback_id(existing),
        }
    }
}

/// Derives the next id from the highest numeric id in the whole set.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxIdPolicy;

impl IdPolicy for MaxIdPolicy {
    fn next_id(&self, existing: &[Appointment]) -> AppointmentId {
        let max = existing
            .iter()
            .filter_map(|record| embedded_number(&record.id))
            .max();

        match max.and_then(|number| number.checked_add(1)) {
            Some(next) => format_id(next),
            None => fallback_id(existing),
        }
    }
}

/// Normalizes a user-typed id into canonical form.
///
/// - `"1"` -> `"Cons01"`
/// - `"cons5"` -> `"Cons05"`
/// - `" CONS12 "` -> `"Cons12"`
/// - anything else is returned trimmed and otherwise untouched.
pub fn normalize_id(input: &str) -> String {
    let trimmed = input.trim();

    if !trimmed.is_empty() && trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        if let Ok(number) = trimmed.parse::<u64>() {
            return format_id(number);
        }
        return trimmed.to_string();
    }

    if has_prefix_ignore_case(trimmed, ID_PREFIX) {
        if let Some(number) = embedded_number(trimmed) {
            return format_id(number);
        }
    }

    trimmed.to_string()
}

/// Formats `number` as a canonical id.
pub fn format_id(number: u64) -> AppointmentId {
    format!("{ID_PREFIX}{number:02}")
}

/// Concatenates every ASCII digit in `value` and parses the result.
///
/// Returns `None` when there are no digits or the number overflows `u64`.
fn embedded_number(value: &str) -> Option<u64> {
    let digits: String = DIGIT_RUN_RE
        .find_iter(value)
        .map(|found| found.as_str())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn fallback_id(existing: &[Appointment]) -> AppointmentId {
    format_id(existing.len() as u64 + 1)
}

fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

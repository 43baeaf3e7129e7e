//! Substring term matching over appointments.
//!
//! # Invariants
//! - Patient and doctor names match case-insensitively.
//! - The date matches against the lowercased term as-is; ISO dates carry
//!   no letters so case never matters in practice.
//! - An empty term matches every record.

use crate::model::appointment::Appointment;

/// Prepared search term, lowercased once per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    needle: String,
}

impl SearchTerm {
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.to_lowercase(),
        }
    }

    /// Returns whether `appointment` contains the term in patient name,
    /// doctor name, or date.
    pub fn matches(&self, appointment: &Appointment) -> bool {
        appointment.patient_name.to_lowercase().contains(&self.needle)
            || appointment.doctor_name.to_lowercase().contains(&self.needle)
            || appointment.date.contains(&self.needle)
    }
}

/// Filters `records` by `term`, preserving order.
pub fn filter_by_term(records: Vec<Appointment>, term: &str) -> Vec<Appointment> {
    let term = SearchTerm::new(term);
    records
        .into_iter()
        .filter(|record| term.matches(record))
        .collect()
}

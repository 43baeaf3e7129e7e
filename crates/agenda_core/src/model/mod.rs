//! Appointment domain model.
//!
//! # Responsibility
//! - Define the canonical appointment record and its line encoding.
//! - Validate user-supplied field values against the field policy.
//!
//! # Invariants
//! - Every appointment is identified by a canonical `ConsNN` id.
//! - `id` and `date` never change after creation.

pub mod appointment;

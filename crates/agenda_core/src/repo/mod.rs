//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record-set storage contract used by services.
//! - Isolate file handling details from scheduling orchestration.
//!
//! # Invariants
//! - Creation only ever appends; update/delete only ever rewrite the whole set.
//! - Loads degrade gracefully: one bad line never hides the other records.

pub mod appointment_repo;
pub mod memory_repo;

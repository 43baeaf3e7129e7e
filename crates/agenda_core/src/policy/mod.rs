//! Identifier generation and normalization.
//!
//! # Responsibility
//! - Derive the next canonical id from the current record set.
//! - Turn user-typed ids (`1`, `cons5`, ` CONS12 `) into canonical form.
//!
//! # Invariants
//! - Canonical ids are `Cons` followed by at least two zero-padded digits.

pub mod id_policy;

//! Record-set search.
//!
//! # Responsibility
//! - Decide whether one appointment matches a free-text term.
//! - Keep matching rules out of the service orchestration code.

pub mod term;

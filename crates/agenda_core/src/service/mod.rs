//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store and id-policy calls into use-case level APIs.
//! - Keep the menu layer decoupled from storage details.

pub mod schedule_service;

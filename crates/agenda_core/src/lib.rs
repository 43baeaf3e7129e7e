//! Core domain logic for the appointment agenda.
//! This crate is the single source of truth for scheduling invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{ConfigError, FieldPolicy, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::appointment::{
    validate_field, Appointment, AppointmentId, FieldError, MalformedRecord, FIELD_DELIMITER,
};
pub use policy::id_policy::{normalize_id, IdPolicy, LastRecordIdPolicy, MaxIdPolicy};
pub use repo::appointment_repo::{
    AppointmentStore, FileAppointmentStore, LoadIssue, LoadOutcome, RepoError, RepoResult,
};
pub use repo::memory_repo::MemoryAppointmentStore;
pub use search::term::{filter_by_term, SearchTerm};
pub use service::schedule_service::{
    AppointmentPatch, NewAppointment, ScheduleService, ServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

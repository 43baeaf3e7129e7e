//! Appointment scheduling use-case service.
//!
//! # Responsibility
//! - Provide create/list/search/update/delete entry points for callers.
//! - Combine store access with id generation and field validation.
//!
//! # Invariants
//! - Every operation re-reads the store first; nothing is cached between calls.
//! - Create only appends; update and delete only rewrite the full set.
//! - Update never touches `id` or `date`.
//! - A missing target id is a `false` result, never an error, and never writes.
//! - Update and delete never rewrite from a load that stopped early.

use crate::config::FieldPolicy;
use crate::model::appointment::{validate_field, Appointment, FieldError};
use crate::policy::id_policy::{normalize_id, IdPolicy, LastRecordIdPolicy};
use crate::repo::appointment_repo::{AppointmentStore, LoadOutcome, RepoError};
use crate::search::term::filter_by_term;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for scheduling use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// A required create field is blank.
    EmptyField(&'static str),
    /// A field value was rejected by the field policy.
    InvalidField(FieldError),
    /// Persistence-layer failure; the file may not have been updated.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "field `{field}` cannot be empty"),
            Self::InvalidField(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyField(_) => None,
            Self::InvalidField(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<FieldError> for ServiceError {
    fn from(value: FieldError) -> Self {
        Self::InvalidField(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Request model for scheduling a new appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient: String,
    pub doctor: String,
    /// Already in ISO `YYYY-MM-DD` storage form.
    pub date: String,
    pub time: String,
}

/// Partial update; `None` or blank means "keep current value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentPatch {
    pub patient: Option<String>,
    pub doctor: Option<String>,
    pub time: Option<String>,
}

impl AppointmentPatch {
    /// Returns whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        [&self.patient, &self.doctor, &self.time]
            .into_iter()
            .all(|value| non_blank(value.as_deref()).is_none())
    }
}

/// Use-case service wrapper for appointment scheduling.
pub struct ScheduleService<S: AppointmentStore, P: IdPolicy = LastRecordIdPolicy> {
    store: S,
    id_policy: P,
    field_policy: FieldPolicy,
}

impl<S: AppointmentStore> ScheduleService<S> {
    /// Creates a service with the default last-record id policy.
    pub fn new(store: S, field_policy: FieldPolicy) -> Self {
        Self::with_id_policy(store, LastRecordIdPolicy, field_policy)
    }
}

impl<S: AppointmentStore, P: IdPolicy> ScheduleService<S, P> {
    /// Creates a service with a caller-chosen id policy.
    pub fn with_id_policy(store: S, id_policy: P, field_policy: FieldPolicy) -> Self {
        Self {
            store,
            id_policy,
            field_policy,
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Schedules a new appointment and appends it to the store.
    ///
    /// # Contract
    /// - All four fields must be non-blank; values are stored trimmed.
    /// - The id comes from the configured `IdPolicy` over the current set.
    ///
    /// # Errors
    /// - `EmptyField` / `InvalidField` before any store access.
    /// - `Repo` when the append fails; the record may not be persisted.
    pub fn create(&self, request: &NewAppointment) -> ServiceResult<Appointment> {
        let patient = self.required_field("patient", &request.patient)?;
        let doctor = self.required_field("doctor", &request.doctor)?;
        let date = self.required_field("date", &request.date)?;
        let time = self.required_field("time", &request.time)?;

        let existing = self.load_records();
        let id = self.id_policy.next_id(&existing);
        let appointment = Appointment::new(id, patient, doctor, date, time);

        if let Err(err) = self.store.append(&appointment) {
            error!(
                "event=appointment_create module=service status=error id={} error={}",
                appointment.id, err
            );
            return Err(err.into());
        }

        info!(
            "event=appointment_create module=service status=ok id={}",
            appointment.id
        );
        Ok(appointment)
    }

    /// Lists every appointment in insertion order.
    pub fn list_all(&self) -> Vec<Appointment> {
        self.load_records()
    }

    /// Finds one appointment by user-typed id.
    pub fn find(&self, id_input: &str) -> Option<Appointment> {
        let id = normalize_id(id_input);
        self.load_records()
            .into_iter()
            .find(|record| record.id == id)
    }

    /// Returns appointments whose patient, doctor, or date contains `term`.
    pub fn search(&self, term: &str) -> Vec<Appointment> {
        let matches = filter_by_term(self.load_records(), term);
        info!(
            "event=appointment_search module=service status=ok term_len={} hits={}",
            term.chars().count(),
            matches.len()
        );
        matches
    }

    /// Applies `patch` to the first appointment with the normalized id.
    ///
    /// Returns `Ok(false)` without writing when no record matches.
    ///
    /// # Errors
    /// - `InvalidField` when a non-blank patch value breaks the field policy.
    /// - `Repo` when the store could not be read to the end, before any write.
    /// - `Repo` when the rewrite fails; the file may be partially written.
    pub fn update(&self, id_input: &str, patch: &AppointmentPatch) -> ServiceResult<bool> {
        let patient = self.optional_field("patient", patch.patient.as_deref())?;
        let doctor = self.optional_field("doctor", patch.doctor.as_deref())?;
        let time = self.optional_field("time", patch.time.as_deref())?;

        let id = normalize_id(id_input);
        let mut records = self.load_for_rewrite("appointment_update", &id)?;
        let Some(target) = records.iter_mut().find(|record| record.id == id) else {
            info!(
                "event=appointment_update module=service status=not_found id={}",
                id
            );
            return Ok(false);
        };

        if let Some(value) = patient {
            target.patient_name = value.to_string();
        }
        if let Some(value) = doctor {
            target.doctor_name = value.to_string();
        }
        if let Some(value) = time {
            target.time = value.to_string();
        }

        self.rewrite("appointment_update", &id, &records)?;
        Ok(true)
    }

    /// Removes every appointment with the normalized id.
    ///
    /// Returns `Ok(false)` without writing when nothing was removed.
    ///
    /// # Errors
    /// - `Repo` when the store could not be read to the end, before any write.
    /// - `Repo` when the rewrite fails; the file may be partially written.
    pub fn delete(&self, id_input: &str) -> ServiceResult<bool> {
        let id = normalize_id(id_input);
        let records = self.load_for_rewrite("appointment_delete", &id)?;
        let original_len = records.len();
        let remaining: Vec<Appointment> = records
            .into_iter()
            .filter(|record| record.id != id)
            .collect();

        if remaining.len() == original_len {
            info!(
                "event=appointment_delete module=service status=not_found id={}",
                id
            );
            return Ok(false);
        }

        self.rewrite("appointment_delete", &id, &remaining)?;
        Ok(true)
    }

    fn load_records(&self) -> Vec<Appointment> {
        let outcome = self.store.load_all();
        log_issues(&outcome);
        outcome.into_records()
    }

    /// Loads the set a full rewrite will be built from.
    ///
    /// Skipped lines are dropped by the rewrite; an early-stopped read is
    /// refused so records past the failure are not erased.
    fn load_for_rewrite(&self, event: &str, id: &str) -> ServiceResult<Vec<Appointment>> {
        let outcome = self.store.load_all();
        log_issues(&outcome);
        outcome.into_complete_records().map_err(|err| {
            error!(
                "event={} module=service status=error id={} error_code=incomplete_load error={}",
                event, id, err
            );
            ServiceError::Repo(err)
        })
    }

    fn rewrite(&self, event: &str, id: &str, records: &[Appointment]) -> ServiceResult<()> {
        match self.store.replace_all(records) {
            Ok(()) => {
                info!("event={} module=service status=ok id={}", event, id);
                Ok(())
            }
            Err(err) => {
                error!(
                    "event={} module=service status=error id={} error={}",
                    event, id, err
                );
                Err(err.into())
            }
        }
    }

    fn required_field<'a>(
        &self,
        field: &'static str,
        value: &'a str,
    ) -> ServiceResult<&'a str> {
        let value = non_blank(Some(value)).ok_or(ServiceError::EmptyField(field))?;
        validate_field(field, value, self.field_policy)?;
        Ok(value)
    }

    fn optional_field<'a>(
        &self,
        field: &'static str,
        value: Option<&'a str>,
    ) -> ServiceResult<Option<&'a str>> {
        let Some(value) = non_blank(value) else {
            return Ok(None);
        };
        validate_field(field, value, self.field_policy)?;
        Ok(Some(value))
    }
}

// `LoadIssue` display text carries line numbers and I/O errors only.
fn log_issues(outcome: &LoadOutcome) {
    for issue in &outcome.issues {
        warn!(
            "event=store_issue module=service status=warn issue={}",
            issue
        );
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

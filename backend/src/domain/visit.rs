//! Medical visit records.
//!
//! Visits are append-only: there is no update or delete path. Each visit
//! references exactly one worker and one authoring doctor.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::account::AccountId;
use super::worker::{Age, Gender, Worker, WorkerIdentifier};

/// Label shown when a visit's author no longer has a profile.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Longest accepted clinical free-text field.
pub const CLINICAL_TEXT_MAX: usize = 10_000;

/// Validation errors for visit drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisitValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

fn clinical_text(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<String>, VisitValidationError> {
    let Some(text) = value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > CLINICAL_TEXT_MAX {
        return Err(VisitValidationError::TooLong {
            field,
            max: CLINICAL_TEXT_MAX,
        });
    }
    Ok(Some(text))
}

/// Clinical fields submitted by a doctor.
///
/// ## Invariants
/// - `symptoms` and `diagnosis` are present and non-blank.
/// - `notes` is `None` rather than blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitDraft {
    visit_date: NaiveDate,
    symptoms: String,
    diagnosis: String,
    notes: Option<String>,
}

impl VisitDraft {
    /// Validate raw form fields. `visit_date` defaults to `today`.
    pub fn new(
        visit_date: Option<NaiveDate>,
        symptoms: Option<String>,
        diagnosis: Option<String>,
        notes: Option<String>,
        today: NaiveDate,
    ) -> Result<Self, VisitValidationError> {
        let symptoms = clinical_text(symptoms, "symptoms")?
            .ok_or(VisitValidationError::MissingField { field: "symptoms" })?;
        let diagnosis = clinical_text(diagnosis, "diagnosis")?
            .ok_or(VisitValidationError::MissingField { field: "diagnosis" })?;
        let notes = clinical_text(notes, "notes")?;
        Ok(Self {
            visit_date: visit_date.unwrap_or(today),
            symptoms,
            diagnosis,
            notes,
        })
    }

    pub fn visit_date(&self) -> NaiveDate {
        self.visit_date
    }

    pub fn symptoms(&self) -> &str {
        &self.symptoms
    }

    pub fn diagnosis(&self) -> &str {
        &self.diagnosis
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Raw visit form as submitted, validated by the recording service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitSubmission {
    pub visit_date: Option<NaiveDate>,
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
}

impl VisitSubmission {
    /// Validate against `today`, which fills a missing visit date.
    pub fn into_draft(self, today: NaiveDate) -> Result<VisitDraft, VisitValidationError> {
        VisitDraft::new(
            self.visit_date,
            self.symptoms,
            self.diagnosis,
            self.notes,
            today,
        )
    }
}

/// Draft bound to its worker and author, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    pub worker_id: Uuid,
    pub doctor_id: AccountId,
    pub draft: VisitDraft,
}

/// Stored visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub doctor_id: AccountId,
    pub visit_date: NaiveDate,
    pub symptoms: String,
    pub diagnosis: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Visit in a worker's history with the author's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoredVisit {
    pub visit: Visit,
    pub doctor_name: Option<String>,
}

impl AuthoredVisit {
    /// Author name, or [`UNKNOWN_AUTHOR`] once the profile is gone.
    pub fn doctor_name_or_unknown(&self) -> &str {
        self.doctor_name.as_deref().unwrap_or(UNKNOWN_AUTHOR)
    }
}

/// Worker fields shown alongside a visit in record lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerBrief {
    pub identifier: WorkerIdentifier,
    pub full_name: String,
    pub age: Age,
    pub gender: Gender,
}

/// Visit joined with the worker it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitWithWorker {
    pub visit: Visit,
    pub worker: WorkerBrief,
}

/// A worker with their full visit history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerHistory {
    pub worker: Worker,
    pub visits: Vec<AuthoredVisit>,
}

/// Which visits a query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitScope {
    /// Every visit in the system.
    All,
    /// Visits authored by one doctor.
    AuthoredBy(AccountId),
}

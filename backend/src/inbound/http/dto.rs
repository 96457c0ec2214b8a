//! Response payloads shared by several handler modules.
//!
//! Domain types stay free of serde and utoipa derives for the wire format;
//! these DTOs own the camelCase JSON shape and the OpenAPI schema.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    AccountProfile, AuthoredVisit, SearchTerm, Visit, VisitWithWorker, Worker, WorkerBrief,
    WorkerHistory, WorkerSummary,
};

/// Optional free-text filter for list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring; blank means no filter.
    pub search: Option<String>,
}

impl SearchQuery {
    pub fn term(&self) -> Option<SearchTerm> {
        SearchTerm::parse(self.search.as_deref())
    }
}

/// Account profile as returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "doctor1@medicare.demo")]
    pub email: String,
    #[schema(example = "Dr. Demo Doctor")]
    pub full_name: String,
    /// `admin` or `doctor`; absent when the role assignment is missing.
    pub role: Option<String>,
    pub created_at: String,
}

impl From<AccountProfile> for AccountResponse {
    fn from(value: AccountProfile) -> Self {
        Self {
            id: value.id.to_string(),
            email: value.email.as_str().to_owned(),
            full_name: value.full_name.as_str().to_owned(),
            role: value.role.map(|role| role.as_str().to_owned()),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Registered worker.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerResponse {
    pub id: String,
    /// Identifier encoded in the worker's QR code.
    #[schema(example = "WKR-000042")]
    pub worker_id: String,
    pub full_name: String,
    pub age: u8,
    #[schema(example = "female")]
    pub gender: String,
    pub registered_by: Option<String>,
    pub created_at: String,
}

impl From<Worker> for WorkerResponse {
    fn from(value: Worker) -> Self {
        Self {
            id: value.id.to_string(),
            worker_id: value.identifier.as_str().to_owned(),
            full_name: value.full_name.as_str().to_owned(),
            age: value.age.years(),
            gender: value.gender.as_str().to_owned(),
            registered_by: value.registered_by.map(|id| id.to_string()),
            created_at: value.registered_at.to_rfc3339(),
        }
    }
}

/// Worker listed with its visit count.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSummaryResponse {
    #[serde(flatten)]
    pub worker: WorkerResponse,
    pub visit_count: u64,
}

impl From<WorkerSummary> for WorkerSummaryResponse {
    fn from(value: WorkerSummary) -> Self {
        Self {
            worker: value.worker.into(),
            visit_count: value.visit_count,
        }
    }
}

/// Stored visit record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitResponse {
    pub id: String,
    pub worker_id: String,
    pub doctor_id: String,
    #[schema(example = "2026-04-01")]
    pub visit_date: String,
    pub symptoms: String,
    pub diagnosis: String,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<Visit> for VisitResponse {
    fn from(value: Visit) -> Self {
        Self {
            id: value.id.to_string(),
            worker_id: value.worker_id.to_string(),
            doctor_id: value.doctor_id.to_string(),
            visit_date: value.visit_date.to_string(),
            symptoms: value.symptoms,
            diagnosis: value.diagnosis,
            notes: value.notes,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Visit in a worker's history.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryVisitResponse {
    #[serde(flatten)]
    pub visit: VisitResponse,
    /// Author's name, `Unknown` once the doctor was removed.
    pub doctor_name: String,
}

impl From<AuthoredVisit> for HistoryVisitResponse {
    fn from(value: AuthoredVisit) -> Self {
        let doctor_name = value.doctor_name_or_unknown().to_owned();
        Self {
            visit: value.visit.into(),
            doctor_name,
        }
    }
}

/// Worker with their visits, newest visit date first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerHistoryResponse {
    pub worker: WorkerResponse,
    pub visits: Vec<HistoryVisitResponse>,
}

impl From<WorkerHistory> for WorkerHistoryResponse {
    fn from(value: WorkerHistory) -> Self {
        Self {
            worker: value.worker.into(),
            visits: value.visits.into_iter().map(Into::into).collect(),
        }
    }
}

/// Worker fields shown next to a visit.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerBriefResponse {
    pub worker_id: String,
    pub full_name: String,
    pub age: u8,
    pub gender: String,
}

impl From<WorkerBrief> for WorkerBriefResponse {
    fn from(value: WorkerBrief) -> Self {
        Self {
            worker_id: value.identifier.as_str().to_owned(),
            full_name: value.full_name,
            age: value.age.years(),
            gender: value.gender.as_str().to_owned(),
        }
    }
}

/// Visit joined with the worker it concerns.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitWithWorkerResponse {
    #[serde(flatten)]
    pub visit: VisitResponse,
    pub worker: WorkerBriefResponse,
}

impl From<VisitWithWorker> for VisitWithWorkerResponse {
    fn from(value: VisitWithWorker) -> Self {
        Self {
            visit: value.visit.into(),
            worker: value.worker.into(),
        }
    }
}

//! Medical visit handlers.
//!
//! ```text
//! GET  /api/v1/workers/{workerId}/visits
//! POST /api/v1/workers/{workerId}/visits
//! GET  /api/v1/visits/mine?search=
//! ```
//!
//! Visits are append-only; there is no update or delete route.

use actix_web::{HttpResponse, get, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, VisitSubmission};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentActor;
use crate::inbound::http::dto::{
    SearchQuery, VisitResponse, VisitWithWorkerResponse, WorkerHistoryResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ValidationCode, field_error, parse_path_identifier,
};

const VISIT_DATE: FieldName = FieldName::new("visitDate");

/// Visit form submitted by a doctor.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordVisitRequest {
    /// `YYYY-MM-DD`; defaults to today.
    #[schema(example = "2026-04-01")]
    pub visit_date: Option<String>,
    #[schema(example = "Persistent cough, mild fever")]
    pub symptoms: Option<String>,
    #[schema(example = "Upper respiratory infection")]
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
}

fn parse_visit_date(raw: Option<String>) -> Result<Option<NaiveDate>, Error> {
    let Some(text) = raw.map(|value| value.trim().to_owned()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            field_error(
                VISIT_DATE,
                ValidationCode::InvalidValue,
                "visitDate must be a date formatted YYYY-MM-DD",
            )
        })
}

impl RecordVisitRequest {
    fn into_submission(self) -> Result<VisitSubmission, Error> {
        Ok(VisitSubmission {
            visit_date: parse_visit_date(self.visit_date)?,
            symptoms: self.symptoms,
            diagnosis: self.diagnosis,
            notes: self.notes,
        })
    }
}

/// A worker with every recorded visit, newest visit date first.
#[utoipa::path(
    get,
    path = "/api/v1/workers/{workerId}/visits",
    params(("workerId" = String, Path, description = "Worker identifier")),
    responses(
        (status = 200, description = "Worker history", body = WorkerHistoryResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Role not permitted", body = ErrorSchema),
        (status = 404, description = "Worker not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["visits"],
    operation_id = "workerHistory"
)]
#[get("/workers/{worker_id}/visits")]
pub async fn worker_history(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<web::Json<WorkerHistoryResponse>> {
    let identifier = parse_path_identifier(&path.into_inner())?;
    let history = state.visits.history(&current.actor, &identifier).await?;
    Ok(web::Json(history.into()))
}

/// Record a visit for a worker.
#[utoipa::path(
    post,
    path = "/api/v1/workers/{workerId}/visits",
    params(("workerId" = String, Path, description = "Worker identifier")),
    request_body = RecordVisitRequest,
    responses(
        (status = 201, description = "Visit recorded", body = VisitResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not a doctor", body = ErrorSchema),
        (status = 404, description = "Worker not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["visits"],
    operation_id = "recordVisit"
)]
#[post("/workers/{worker_id}/visits")]
pub async fn record_visit(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
    payload: web::Json<RecordVisitRequest>,
) -> ApiResult<HttpResponse> {
    let identifier = parse_path_identifier(&path.into_inner())?;
    let submission = payload.into_inner().into_submission()?;
    let visit = state
        .visits
        .record_visit(&current.actor, &identifier, submission)
        .await?;
    Ok(HttpResponse::Created().json(VisitResponse::from(visit)))
}

/// Visits authored by the calling doctor.
#[utoipa::path(
    get,
    path = "/api/v1/visits/mine",
    params(SearchQuery),
    responses(
        (status = 200, description = "Own visits", body = [VisitWithWorkerResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not a doctor", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["visits"],
    operation_id = "myVisits"
)]
#[get("/visits/mine")]
pub async fn my_visits(
    state: web::Data<HttpState>,
    current: CurrentActor,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<VisitWithWorkerResponse>>> {
    let visits = state
        .visits
        .authored_visits(&current.actor, query.term())
        .await?;
    Ok(web::Json(visits.into_iter().map(Into::into).collect()))
}

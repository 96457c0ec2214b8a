//! Worker registry handlers.
//!
//! ```text
//! POST   /api/v1/workers
//! GET    /api/v1/workers?search=
//! GET    /api/v1/workers/{workerId}
//! DELETE /api/v1/workers/{workerId}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, FullName, Role, WorkerRegistration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentActor;
use crate::inbound::http::dto::{SearchQuery, WorkerResponse, WorkerSummaryResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, account_field_error, parse_age, parse_gender, parse_path_identifier, require_text,
};

const FULL_NAME: FieldName = FieldName::new("fullName");
const AGE: FieldName = FieldName::new("age");
const GENDER: FieldName = FieldName::new("gender");

/// Registration form. The identifier is issued by the server.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterWorkerRequest {
    #[schema(example = "Asha Rao")]
    pub full_name: Option<String>,
    #[schema(example = 34, minimum = 18, maximum = 100)]
    pub age: Option<i64>,
    #[schema(example = "female")]
    pub gender: Option<String>,
}

fn parse_registration(payload: RegisterWorkerRequest) -> Result<WorkerRegistration, Error> {
    let full_name = require_text(payload.full_name, FULL_NAME)?;
    Ok(WorkerRegistration {
        full_name: FullName::new(full_name).map_err(account_field_error)?,
        age: parse_age(payload.age, AGE)?,
        gender: parse_gender(payload.gender, GENDER)?,
    })
}

/// Register a worker and issue their identifier.
#[utoipa::path(
    post,
    path = "/api/v1/workers",
    request_body = RegisterWorkerRequest,
    responses(
        (status = 201, description = "Worker registered", body = WorkerResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["workers"],
    operation_id = "registerWorker"
)]
#[post("/workers")]
pub async fn register_worker(
    state: web::Data<HttpState>,
    current: CurrentActor,
    payload: web::Json<RegisterWorkerRequest>,
) -> ApiResult<HttpResponse> {
    current.actor.require(Role::Admin)?;
    let registration = parse_registration(payload.into_inner())?;
    let worker = state.workers.register(&current.actor, registration).await?;
    Ok(HttpResponse::Created().json(WorkerResponse::from(worker)))
}

/// Workers newest first with their visit counts.
#[utoipa::path(
    get,
    path = "/api/v1/workers",
    params(SearchQuery),
    responses(
        (status = 200, description = "Workers", body = [WorkerSummaryResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["workers"],
    operation_id = "listWorkers"
)]
#[get("/workers")]
pub async fn list_workers(
    state: web::Data<HttpState>,
    current: CurrentActor,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<WorkerSummaryResponse>>> {
    let workers = state.workers.list(&current.actor, query.term()).await?;
    Ok(web::Json(workers.into_iter().map(Into::into).collect()))
}

/// Look a worker up by the identifier printed on their QR code.
#[utoipa::path(
    get,
    path = "/api/v1/workers/{workerId}",
    params(("workerId" = String, Path, description = "Worker identifier")),
    responses(
        (status = 200, description = "Worker", body = WorkerResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Role not permitted", body = ErrorSchema),
        (status = 404, description = "Worker not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["workers"],
    operation_id = "findWorker"
)]
#[get("/workers/{worker_id}")]
pub async fn find_worker(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<web::Json<WorkerResponse>> {
    let identifier = parse_path_identifier(&path.into_inner())?;
    let worker = state.workers.find(&current.actor, &identifier).await?;
    Ok(web::Json(worker.into()))
}

/// Delete a worker together with their visits.
#[utoipa::path(
    delete,
    path = "/api/v1/workers/{workerId}",
    params(("workerId" = String, Path, description = "Worker identifier")),
    responses(
        (status = 204, description = "Worker deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 404, description = "Worker not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["workers"],
    operation_id = "deleteWorker"
)]
#[delete("/workers/{worker_id}")]
pub async fn delete_worker(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let identifier = parse_path_identifier(&path.into_inner())?;
    state.workers.remove(&current.actor, &identifier).await?;
    Ok(HttpResponse::NoContent().finish())
}

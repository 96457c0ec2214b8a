//! Dashboard statistics handlers.
//!
//! ```text
//! GET /api/v1/dashboard/admin
//! GET /api/v1/dashboard/doctor
//! ```
//!
//! A count that failed to load is `null` rather than failing the request.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AdminOverview, DoctorOverview};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentActor;
use crate::inbound::http::dto::VisitWithWorkerResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// System-wide statistics.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardResponse {
    pub total_workers: Option<u64>,
    pub total_doctors: Option<u64>,
    pub total_visits: Option<u64>,
    pub recent_visits: Vec<VisitWithWorkerResponse>,
}

impl From<AdminOverview> for AdminDashboardResponse {
    fn from(value: AdminOverview) -> Self {
        Self {
            total_workers: value.workers,
            total_doctors: value.doctors,
            total_visits: value.visits,
            recent_visits: value.recent_visits.into_iter().map(Into::into).collect(),
        }
    }
}

/// Statistics scoped to the calling doctor.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDashboardResponse {
    pub my_visits: Option<u64>,
    pub today_visits: Option<u64>,
    pub total_workers: Option<u64>,
    pub recent_visits: Vec<VisitWithWorkerResponse>,
}

impl From<DoctorOverview> for DoctorDashboardResponse {
    fn from(value: DoctorOverview) -> Self {
        Self {
            my_visits: value.my_visits,
            today_visits: value.today_visits,
            total_workers: value.total_workers,
            recent_visits: value.recent_visits.into_iter().map(Into::into).collect(),
        }
    }
}

/// Admin dashboard.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/admin",
    responses(
        (status = 200, description = "Admin statistics", body = AdminDashboardResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "adminDashboard"
)]
#[get("/dashboard/admin")]
pub async fn admin_dashboard(
    state: web::Data<HttpState>,
    current: CurrentActor,
) -> ApiResult<web::Json<AdminDashboardResponse>> {
    let overview = state.dashboard.admin_overview(&current.actor).await?;
    Ok(web::Json(overview.into()))
}

/// Doctor dashboard.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/doctor",
    responses(
        (status = 200, description = "Doctor statistics", body = DoctorDashboardResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not a doctor", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "doctorDashboard"
)]
#[get("/dashboard/doctor")]
pub async fn doctor_dashboard(
    state: web::Data<HttpState>,
    current: CurrentActor,
) -> ApiResult<web::Json<DoctorDashboardResponse>> {
    let overview = state.dashboard.doctor_overview(&current.actor).await?;
    Ok(web::Json(overview.into()))
}

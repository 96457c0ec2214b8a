//! Account provisioning functions.
//!
//! ```text
//! POST /api/v1/functions/create-demo-accounts
//! POST /api/v1/functions/create-doctor
//! ```
//!
//! Both keep the `{ success, message, ... }` envelope their callers expect.
//! `create-doctor` takes the raw bearer credential rather than
//! [`CurrentActor`](crate::inbound::http::auth::CurrentActor) because the
//! provisioning service re-validates it itself.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccountProfile, DemoAccount, DoctorAccountRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerToken;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Credentials of a seeded demo account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemoAccountResponse {
    pub email: String,
    pub password: String,
    #[schema(example = "admin")]
    pub role: String,
}

impl From<DemoAccount> for DemoAccountResponse {
    fn from(value: DemoAccount) -> Self {
        Self {
            email: value.email.to_owned(),
            password: value.password.to_owned(),
            role: value.role.as_str().to_owned(),
        }
    }
}

/// Result of seeding the demo accounts.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemoAccountsResponse {
    pub success: bool,
    pub message: String,
    pub accounts: Vec<DemoAccountResponse>,
}

/// Doctor-creation request body. Every field is required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
}

impl From<CreateDoctorRequest> for DoctorAccountRequest {
    fn from(value: CreateDoctorRequest) -> Self {
        Self {
            email: value.email,
            password: value.password,
            full_name: value.full_name,
        }
    }
}

/// Identity of the created doctor.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedDoctor {
    pub id: String,
    pub email: String,
    pub full_name: String,
}

impl From<AccountProfile> for CreatedDoctor {
    fn from(value: AccountProfile) -> Self {
        Self {
            id: value.id.to_string(),
            email: value.email.as_str().to_owned(),
            full_name: value.full_name.as_str().to_owned(),
        }
    }
}

/// Result of creating a doctor account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorResponse {
    pub success: bool,
    pub message: String,
    pub doctor: CreatedDoctor,
}

/// Seed one admin and one doctor with fixed demo credentials.
#[utoipa::path(
    post,
    path = "/api/v1/functions/create-demo-accounts",
    responses(
        (status = 200, description = "Demo accounts created", body = DemoAccountsResponse),
        (status = 400, description = "An admin already exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["provisioning"],
    operation_id = "createDemoAccounts",
    security([])
)]
#[post("/functions/create-demo-accounts")]
pub async fn create_demo_accounts(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<DemoAccountsResponse>> {
    let accounts = state.provisioning.create_demo_accounts().await?;
    Ok(web::Json(DemoAccountsResponse {
        success: true,
        message: "Demo accounts created successfully".to_owned(),
        accounts: accounts.into_iter().map(Into::into).collect(),
    }))
}

/// Create a doctor account on behalf of an admin.
#[utoipa::path(
    post,
    path = "/api/v1/functions/create-doctor",
    request_body = CreateDoctorRequest,
    responses(
        (status = 200, description = "Doctor created", body = CreateDoctorResponse),
        (status = 400, description = "Missing or invalid fields, or email already registered", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["provisioning"],
    operation_id = "createDoctor"
)]
#[post("/functions/create-doctor")]
pub async fn create_doctor(
    state: web::Data<HttpState>,
    credential: BearerToken,
    payload: Result<web::Json<CreateDoctorRequest>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    // An unreadable body counts as empty so the credential and role checks
    // still decide the response first.
    let request = payload.map(web::Json::into_inner).unwrap_or_default();
    let profile = state
        .provisioning
        .create_doctor(credential.into_inner(), request.into())
        .await?;
    Ok(HttpResponse::Ok().json(CreateDoctorResponse {
        success: true,
        message: "Doctor account created successfully".to_owned(),
        doctor: profile.into(),
    }))
}

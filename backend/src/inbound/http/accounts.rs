//! Session HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/login
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, LoginValidationError, Session};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentActor;
use crate::inbound::http::dto::AccountResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ValidationCode, account_field_error, field_error, require_text,
};

const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "admin@medicare.demo")]
    pub email: Option<String>,
    #[schema(example = "admin123")]
    pub password: Option<String>,
}

/// Issued bearer session.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Opaque token for the `Authorization: Bearer` header.
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub expires_at: String,
    pub account: AccountResponse,
}

impl From<Session> for SessionResponse {
    fn from(value: Session) -> Self {
        Self {
            access_token: value.token.expose().to_owned(),
            token_type: "Bearer".to_owned(),
            expires_at: value.expires_at.to_rfc3339(),
            account: value.profile.into(),
        }
    }
}

fn parse_login(payload: LoginRequest) -> Result<LoginCredentials, Error> {
    let email = require_text(payload.email, EMAIL)?;
    let password = payload.password.unwrap_or_default();
    LoginCredentials::try_from_parts(&email, &password).map_err(|err| match err {
        LoginValidationError::Email(inner) => account_field_error(inner),
        LoginValidationError::EmptyPassword => {
            field_error(PASSWORD, ValidationCode::MissingField, "password is required")
        }
    })
}

/// Exchange email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued", body = SessionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 403, description = "Account has no role", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let credentials = parse_login(payload.into_inner())?;
    let session = state.auth.login(&credentials).await?;
    Ok(web::Json(session.into()))
}

/// Revoke the presented bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    current: CurrentActor,
) -> ApiResult<HttpResponse> {
    state.auth.logout(&current.token).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Profile of the authenticated caller.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentAccount"
)]
#[get("/auth/me")]
pub async fn current_account(
    state: web::Data<HttpState>,
    current: CurrentActor,
) -> ApiResult<web::Json<AccountResponse>> {
    let profile = state.auth.current_account(&current.actor).await?;
    Ok(web::Json(profile.into()))
}

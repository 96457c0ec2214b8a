//! Worker lookup from a scanned or typed identifier.
//!
//! ```text
//! POST /api/v1/scans/manual
//! POST /api/v1/scans/image
//! ```
//!
//! Live camera capture runs on the client device; the server accepts either
//! the identifier typed in as a fallback or a still image to decode.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{Error, Role, WorkerIdentifier};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentActor;
use crate::inbound::http::dto::WorkerResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::scanning::codec::decode_image;
use crate::scanning::manual::INVALID_MANUAL_ENTRY;
use crate::scanning::{ManualEntry, ScanError};

/// Largest accepted still image upload.
pub const MAX_SCAN_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Identifier typed in by hand.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualScanRequest {
    #[schema(example = "WKR-000042")]
    pub worker_id: Option<String>,
}

/// Map scanner failures onto client-facing errors.
pub(crate) fn map_scan_error(error: ScanError) -> Error {
    match error {
        ScanError::DecodeFailure => {
            Error::invalid_request(error.to_string()).with_reason("decode_failure")
        }
        ScanError::NoCameraFound => {
            Error::invalid_request(error.to_string()).with_reason("no_camera_found")
        }
        ScanError::NotScanning => {
            Error::invalid_request(error.to_string()).with_reason("not_scanning")
        }
        ScanError::Device { .. } | ScanError::Encode { .. } => Error::internal(error.to_string()),
    }
}

async fn lookup(
    state: &HttpState,
    current: &CurrentActor,
    identifier: &WorkerIdentifier,
) -> ApiResult<web::Json<WorkerResponse>> {
    let worker = state.workers.find(&current.actor, identifier).await?;
    Ok(web::Json(worker.into()))
}

/// Resolve a typed identifier to its worker.
#[utoipa::path(
    post,
    path = "/api/v1/scans/manual",
    request_body = ManualScanRequest,
    responses(
        (status = 200, description = "Worker", body = WorkerResponse),
        (status = 400, description = "Identifier is not valid", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not a doctor", body = ErrorSchema),
        (status = 404, description = "Worker not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["scans"],
    operation_id = "scanManual"
)]
#[post("/scans/manual")]
pub async fn scan_manual(
    state: web::Data<HttpState>,
    current: CurrentActor,
    payload: web::Json<ManualScanRequest>,
) -> ApiResult<web::Json<WorkerResponse>> {
    current.actor.require(Role::Doctor)?;
    let raw = payload.into_inner().worker_id.unwrap_or_default();
    let entry = ManualEntry::parse(&raw).map_err(|_| {
        Error::invalid_request(INVALID_MANUAL_ENTRY).with_reason("invalid_manual_entry")
    })?;
    lookup(&state, &current, entry.identifier()).await
}

/// Decode a QR code from an uploaded image and resolve its worker.
#[utoipa::path(
    post,
    path = "/api/v1/scans/image",
    request_body(content = Vec<u8>, content_type = "image/png", description = "PNG or JPEG photo"),
    responses(
        (status = 200, description = "Worker", body = WorkerResponse),
        (status = 400, description = "No QR code found", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not a doctor", body = ErrorSchema),
        (status = 404, description = "Worker not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["scans"],
    operation_id = "scanImage"
)]
#[post("/scans/image")]
pub async fn scan_image(
    state: web::Data<HttpState>,
    current: CurrentActor,
    body: web::Bytes,
) -> ApiResult<web::Json<WorkerResponse>> {
    current.actor.require(Role::Doctor)?;
    let decoded = web::block(move || decode_image(&body))
        .await
        .map_err(|err| Error::internal(format!("image decoding task failed: {err}")))?
        .map_err(map_scan_error)?;
    debug!(payload = %decoded, "decoded QR payload");
    let identifier = WorkerIdentifier::new(&decoded)
        .map_err(|_| Error::not_found("Worker not found").with_reason("worker_not_found"))?;
    lookup(&state, &current, &identifier).await
}

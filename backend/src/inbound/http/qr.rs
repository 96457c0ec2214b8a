//! QR code exports for registered workers.
//!
//! ```text
//! GET /api/v1/workers/{workerId}/qr.svg?size=
//! GET /api/v1/workers/{workerId}/qr.png?size=
//! GET /api/v1/workers/{workerId}/qr/print?size=
//! ```

use actix_web::http::header::{CONTENT_DISPOSITION, ContentType};
use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, Role, Worker};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentActor;
use crate::inbound::http::scans::map_scan_error;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_path_identifier;
use crate::scanning::codec::{encode_png, encode_svg, print_document};

/// Smallest rendered edge length in pixels.
pub const MIN_QR_SIZE: u32 = 64;
/// Largest rendered edge length in pixels.
pub const MAX_QR_SIZE: u32 = 1024;

/// Optional rendering size, clamped to the supported range.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QrQuery {
    /// Edge length in pixels; PNG downloads are rendered at twice this.
    pub size: Option<u32>,
}

impl QrQuery {
    fn resolve(&self, default: u32) -> u32 {
        self.size.unwrap_or(default).clamp(MIN_QR_SIZE, MAX_QR_SIZE)
    }
}

async fn exported_worker(
    state: &HttpState,
    current: &CurrentActor,
    raw: &str,
) -> ApiResult<Worker> {
    current.actor.require(Role::Admin)?;
    let identifier = parse_path_identifier(raw)?;
    state.workers.find(&current.actor, &identifier).await
}

/// Inline SVG symbol encoding the worker identifier.
#[utoipa::path(
    get,
    path = "/api/v1/workers/{workerId}/qr.svg",
    params(("workerId" = String, Path, description = "Worker identifier"), QrQuery),
    responses(
        (status = 200, description = "SVG markup", content_type = "image/svg+xml", body = String),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 404, description = "Worker not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["qr"],
    operation_id = "workerQrSvg"
)]
#[get("/workers/{worker_id}/qr.svg")]
pub async fn qr_svg(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
    query: web::Query<QrQuery>,
) -> ApiResult<HttpResponse> {
    let worker = exported_worker(&state, &current, &path.into_inner()).await?;
    let markup = encode_svg(worker.identifier.as_str(), query.resolve(state.qr_size))
        .map_err(map_scan_error)?;
    Ok(HttpResponse::Ok()
        .content_type("image/svg+xml")
        .body(markup))
}

/// Downloadable PNG named after the worker identifier.
#[utoipa::path(
    get,
    path = "/api/v1/workers/{workerId}/qr.png",
    params(("workerId" = String, Path, description = "Worker identifier"), QrQuery),
    responses(
        (status = 200, description = "PNG image", content_type = "image/png", body = Vec<u8>),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 404, description = "Worker not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["qr"],
    operation_id = "workerQrPng"
)]
#[get("/workers/{worker_id}/qr.png")]
pub async fn qr_png(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
    query: web::Query<QrQuery>,
) -> ApiResult<HttpResponse> {
    let worker = exported_worker(&state, &current, &path.into_inner()).await?;
    let size = query.resolve(state.qr_size);
    let identifier = worker.identifier.clone();
    let png = web::block(move || encode_png(identifier.as_str(), size))
        .await
        .map_err(|err| Error::internal(format!("QR rendering task failed: {err}")))?
        .map_err(map_scan_error)?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::png())
        .insert_header((
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"QR-{}.png\"", worker.identifier),
        ))
        .body(png))
}

/// Printable HTML page with the worker's name and QR code.
#[utoipa::path(
    get,
    path = "/api/v1/workers/{workerId}/qr/print",
    params(("workerId" = String, Path, description = "Worker identifier"), QrQuery),
    responses(
        (status = 200, description = "Print page", content_type = "text/html", body = String),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 404, description = "Worker not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["qr"],
    operation_id = "workerQrPrint"
)]
#[get("/workers/{worker_id}/qr/print")]
pub async fn qr_print(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
    query: web::Query<QrQuery>,
) -> ApiResult<HttpResponse> {
    let worker = exported_worker(&state, &current, &path.into_inner()).await?;
    let page = print_document(
        worker.identifier.as_str(),
        worker.full_name.as_str(),
        query.resolve(state.qr_size),
    )
    .map_err(map_scan_error)?;
    Ok(HttpResponse::Ok().content_type(ContentType::html()).body(page))
}

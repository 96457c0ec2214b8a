//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod auth;
pub mod dashboard;
pub mod doctors;
pub mod dto;
pub mod error;
pub mod health;
pub mod provisioning;
pub mod qr;
pub mod scans;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;
pub mod visits;
pub mod workers;

use actix_web::web;

use crate::domain::Error;

pub use error::ApiResult;

fn rejected_body(message: String) -> actix_web::Error {
    Error::invalid_request(message)
        .with_reason("malformed_request")
        .into()
}

/// Register every `/api/v1` route on `cfg`.
///
/// The server and the integration tests share this so both exercise the same
/// route table. QR export routes are registered before the bare worker
/// lookup so the longer paths win.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::PayloadConfig::new(scans::MAX_SCAN_IMAGE_BYTES))
            .app_data(
                web::JsonConfig::default().error_handler(|err, _| rejected_body(err.to_string())),
            )
            .app_data(
                web::QueryConfig::default().error_handler(|err, _| rejected_body(err.to_string())),
            )
            .service(accounts::login)
            .service(accounts::logout)
            .service(accounts::current_account)
            .service(provisioning::create_demo_accounts)
            .service(provisioning::create_doctor)
            .service(doctors::list_doctors)
            .service(doctors::remove_doctor)
            .service(qr::qr_svg)
            .service(qr::qr_png)
            .service(qr::qr_print)
            .service(visits::worker_history)
            .service(visits::record_visit)
            .service(visits::my_visits)
            .service(workers::register_worker)
            .service(workers::list_workers)
            .service(workers::find_worker)
            .service(workers::delete_worker)
            .service(scans::scan_manual)
            .service(scans::scan_image)
            .service(dashboard::admin_dashboard)
            .service(dashboard::doctor_dashboard),
    );
}

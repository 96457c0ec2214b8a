//! Liveness and readiness probes.
//!
//! ```text
//! GET /health/ready
//! GET /health/live
//! ```
//!
//! The server marks itself ready once storage is wired (and migrations have
//! run when PostgreSQL is configured) and unhealthy when shutdown begins.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::header::CACHE_CONTROL;
use actix_web::{HttpResponse, get, web};

/// Probe flags shared between the server and the probe handlers.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Not ready, but alive.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness so orchestrators stop routing during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

fn probe(ok: bool) -> HttpResponse {
    let mut builder = if ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    builder.insert_header((CACHE_CONTROL, "no-store")).finish()
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Storage is wired and the server accepts traffic"),
        (status = 503, description = "Server is still starting")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_ready())
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Process is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test::{self}};
    use rstest::rstest;

    #[rstest]
    #[case(false, false, StatusCode::SERVICE_UNAVAILABLE, StatusCode::OK)]
    #[case(true, false, StatusCode::OK, StatusCode::OK)]
    #[case(true, true, StatusCode::OK, StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn probes_follow_the_flags(
        #[case] ready_flag: bool,
        #[case] draining: bool,
        #[case] ready_status: StatusCode,
        #[case] live_status: StatusCode,
    ) {
        let health = web::Data::new(HealthState::new());
        if ready_flag {
            health.mark_ready();
        }
        if draining {
            health.mark_unhealthy();
        }
        let app = test::init_service(App::new().app_data(health).service(ready).service(live))
            .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(res.status(), ready_status);
        assert_eq!(
            res.headers().get(CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some("no-store")
        );

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/health/live").to_request())
                .await;
        assert_eq!(res.status(), live_status);
    }
}

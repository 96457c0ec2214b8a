//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/api/v1` operation, the health probes and the
//! error schema wrappers, and declares bearer-token authentication as the
//! default security requirement. Public operations (login, demo
//! provisioning, probes) opt out with `security([])` on their path.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerToken";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Opaque token issued by POST /api/v1/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API, served by Swagger UI in debug builds.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Medicare worker records API",
        description = "Worker registration, QR identification and visit records for admins and doctors."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::current_account,
        crate::inbound::http::provisioning::create_demo_accounts,
        crate::inbound::http::provisioning::create_doctor,
        crate::inbound::http::doctors::list_doctors,
        crate::inbound::http::doctors::remove_doctor,
        crate::inbound::http::workers::register_worker,
        crate::inbound::http::workers::list_workers,
        crate::inbound::http::workers::find_worker,
        crate::inbound::http::workers::delete_worker,
        crate::inbound::http::qr::qr_svg,
        crate::inbound::http::qr::qr_png,
        crate::inbound::http::qr::qr_print,
        crate::inbound::http::visits::worker_history,
        crate::inbound::http::visits::record_visit,
        crate::inbound::http::visits::my_visits,
        crate::inbound::http::scans::scan_manual,
        crate::inbound::http::scans::scan_image,
        crate::inbound::http::dashboard::admin_dashboard,
        crate::inbound::http::dashboard::doctor_dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "auth", description = "Bearer session lifecycle"),
        (name = "provisioning", description = "Demo and doctor account creation"),
        (name = "doctors", description = "Admin-managed doctor directory"),
        (name = "workers", description = "Worker registry"),
        (name = "qr", description = "QR code exports"),
        (name = "visits", description = "Append-only medical visit records"),
        (name = "scans", description = "Worker lookup from scanned or typed identifiers"),
        (name = "dashboard", description = "Role-specific statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

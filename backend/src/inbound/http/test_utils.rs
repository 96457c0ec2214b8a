//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use mockable::DefaultClock;

use crate::domain::ports::MockAuthService;
use crate::domain::{AccessToken, LoginCredentials};
use crate::test_support::memory_http_state;

use super::state::HttpState;

/// State wired over a fresh in-memory store.
pub fn memory_state() -> HttpState {
    memory_http_state(Arc::new(DefaultClock))
}

/// Memory-backed state whose auth port is a configured mock.
pub fn http_state_with_auth(configure: impl FnOnce(&mut MockAuthService)) -> HttpState {
    let mut auth = MockAuthService::new();
    configure(&mut auth);
    let mut state = memory_state();
    state.auth = Arc::new(auth);
    state
}

/// Well-formed token; whether it resolves depends on the auth port.
pub fn valid_token() -> AccessToken {
    AccessToken::parse(&"ab".repeat(32)).expect("64 hex characters form a token")
}

/// `Authorization` header pair for a token.
pub fn bearer(token: &AccessToken) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {}", token.expose()))
}

/// Memory state with the demo admin and doctor already provisioned.
pub async fn seeded_state() -> HttpState {
    let state = memory_state();
    state
        .provisioning
        .create_demo_accounts()
        .await
        .expect("demo accounts seeded");
    state
}

/// Log in through the auth port and return the issued token.
pub async fn login_token(state: &HttpState, email: &str, password: &str) -> AccessToken {
    let credentials = LoginCredentials::try_from_parts(email, password).expect("credentials");
    state.auth.login(&credentials).await.expect("login").token
}

/// Token of the demo admin.
pub async fn admin_token(state: &HttpState) -> AccessToken {
    login_token(state, "admin@medicare.demo", "admin123").await
}

/// Token of the demo doctor.
pub async fn doctor_token(state: &HttpState) -> AccessToken {
    login_token(state, "doctor1@medicare.demo", "doctor123").await
}

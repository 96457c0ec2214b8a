//! HTTP server configuration object.

use std::net::SocketAddr;

use chrono::TimeDelta;
use medicare_backend::domain::DEFAULT_TOKEN_TTL;
use medicare_backend::outbound::password::DEFAULT_PASSWORD_ITERATIONS;
use medicare_backend::outbound::persistence::DbPool;
use medicare_backend::scanning::DEFAULT_QR_SIZE;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) token_ttl: TimeDelta,
    pub(crate) password_iterations: u32,
    pub(crate) qr_size: u32,
}

impl ServerConfig {
    /// In-memory storage with default token, hashing and QR settings.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            token_ttl: DEFAULT_TOKEN_TTL,
            password_iterations: DEFAULT_PASSWORD_ITERATIONS,
            qr_size: DEFAULT_QR_SIZE,
        }
    }

    /// Back the ports with PostgreSQL instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_token_ttl(mut self, ttl: TimeDelta) -> Self {
        self.token_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_password_iterations(mut self, iterations: u32) -> Self {
        self.password_iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_qr_size(mut self, size: u32) -> Self {
        self.qr_size = size;
        self
    }
}

//! Builds the HTTP state from either PostgreSQL or in-memory adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use medicare_backend::inbound::http::state::{HttpState, HttpStatePorts};
use medicare_backend::outbound::memory::InMemoryStore;
use medicare_backend::outbound::password::PasswordHasher;
use medicare_backend::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselTokenStore, DieselVisitRepository,
    DieselWorkerRepository,
};

use super::ServerConfig;

fn diesel_ports(
    pool: &DbPool,
    hasher: PasswordHasher,
    clock: Arc<dyn Clock>,
    config: &ServerConfig,
) -> HttpStatePorts {
    HttpStatePorts::from_repositories(
        Arc::new(DieselAccountRepository::new(pool.clone(), hasher)),
        Arc::new(DieselTokenStore::new(pool.clone())),
        Arc::new(DieselWorkerRepository::new(pool.clone())),
        Arc::new(DieselVisitRepository::new(pool.clone())),
        clock,
        config.token_ttl,
    )
}

fn memory_ports(hasher: PasswordHasher, clock: Arc<dyn Clock>, config: &ServerConfig) -> HttpStatePorts {
    let store = Arc::new(InMemoryStore::new(hasher, Arc::clone(&clock)));
    HttpStatePorts::from_repositories(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        store,
        clock,
        config.token_ttl,
    )
}

/// Wire every driving port over the configured storage.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher = PasswordHasher::new(config.password_iterations);
    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL storage");
            diesel_ports(pool, hasher, clock, config)
        }
        None => {
            warn!("no database configured; records are kept in memory and lost on restart");
            memory_ports(hasher, clock, config)
        }
    };
    web::Data::new(HttpState::new(ports).with_qr_size(config.qr_size))
}

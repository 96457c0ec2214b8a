//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use medicare_backend::inbound::http::health::HealthState;
use medicare_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use medicare_backend::settings::ServerSettings;
use server::{ServerConfig, create_server};

async fn migrate_and_connect(url: &str, max_size: u32) -> std::io::Result<DbPool> {
    let migration_url = url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;
    info!(applied, "database migrations complete");

    DbPool::new(PoolConfig::new(url).with_max_size(max_size))
        .await
        .map_err(std::io::Error::other)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let mut config = ServerConfig::new(bind_addr)
        .with_token_ttl(settings.token_ttl().map_err(std::io::Error::other)?)
        .with_password_iterations(
            settings
                .password_iterations()
                .map_err(std::io::Error::other)?,
        )
        .with_qr_size(settings.qr_size());

    if let Some(url) = settings.database_url() {
        let pool = migrate_and_connect(url, settings.pool_max_size()).await?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), &config)?;
    info!(%bind_addr, "server listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result
}

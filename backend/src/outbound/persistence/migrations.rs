//! Embedded schema migrations.
//!
//! The SQL under `backend/migrations` is compiled into the binary so a fresh
//! database can be brought up to date at start-up without the Diesel CLI.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failure while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("could not connect to run migrations: {message}")]
    Connection { message: String },
    #[error("migration failed: {message}")]
    Apply { message: String },
}

/// Apply every pending migration against `database_url`.
///
/// Blocking: call it from `spawn_blocking` or before the runtime starts.
///
/// # Errors
///
/// Returns [`MigrationError`] when the database is unreachable or a
/// migration fails.
pub fn run_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| {
        MigrationError::Connection {
            message: err.to_string(),
        }
    })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    for version in &applied {
        info!(%version, "applied migration");
    }
    Ok(applied.len())
}

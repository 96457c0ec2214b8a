//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository implements one driven port on top of a shared
//! [`DbPool`]. Row structs and the `table!` schema stay private to this
//! module; only domain types cross the boundary.
//!
//! ```no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use medicare_backend::outbound::password::PasswordHasher;
//! use medicare_backend::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/medicare")).await?;
//! let accounts = DieselAccountRepository::new(pool, PasswordHasher::default());
//! # let _ = accounts;
//! # Ok(())
//! # }
//! ```

mod diesel_account_repository;
mod diesel_basic_error_mapping;
mod diesel_token_store;
mod diesel_visit_repository;
mod diesel_worker_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_token_store::DieselTokenStore;
pub use diesel_visit_repository::DieselVisitRepository;
pub use diesel_worker_repository::DieselWorkerRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DEFAULT_POOL_MAX_SIZE, DbPool, PoolConfig, PoolError};

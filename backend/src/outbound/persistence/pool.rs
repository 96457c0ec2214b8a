//! bb8 pool of `diesel-async` PostgreSQL connections.
//!
//! Every Diesel repository holds a clone of [`DbPool`]; clones share the
//! same underlying pool. Checkout failures surface as [`PoolError`], which
//! each repository maps to its own connection error.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Default upper bound on open connections.
pub const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Pool construction and checkout failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available in time.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// The pool could not be created.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Connection pool settings.
///
/// ```
/// use std::time::Duration;
/// use medicare_backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://clinic@localhost/medicare")
///     .with_max_size(4)
///     .with_connection_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_size(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Settings for `database_url` with ten connections, one kept idle and a
    /// ten second checkout timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_POOL_MAX_SIZE,
            min_idle: Some(1),
            connection_timeout: Duration::from_secs(10),
        }
    }

    /// Cap the number of open connections. Zero is raised to one.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}

/// Shared async connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool and open its idle connections.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the URL is invalid or the server is
    /// unreachable.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
        let min_idle = config.min_idle.map(|idle| idle.min(config.max_size));

        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when the timeout elapses first.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

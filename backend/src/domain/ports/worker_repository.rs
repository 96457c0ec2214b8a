//! Port for worker persistence and identifier issuance.

use async_trait::async_trait;

use crate::domain::{NewWorker, SearchTerm, Worker, WorkerIdentifier, WorkerSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by worker repository adapters.
    pub enum WorkerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "worker repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "worker repository query failed: {message}",
        /// The identifier has already been issued.
        DuplicateIdentifier { identifier: String } =>
            "worker identifier {identifier} already issued",
    }
}

/// Port over registered workers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkerRepository: Send + Sync {
    /// Draw the next identifier from the store's sequence.
    async fn next_identifier(&self) -> Result<WorkerIdentifier, WorkerRepositoryError>;

    /// Persist a new worker.
    async fn insert(&self, worker: &NewWorker) -> Result<Worker, WorkerRepositoryError>;

    /// Look a worker up by identifier.
    async fn find_by_identifier(
        &self,
        identifier: &WorkerIdentifier,
    ) -> Result<Option<Worker>, WorkerRepositoryError>;

    /// Workers newest first with visit counts, filtered on name or identifier.
    async fn list(
        &self,
        search: Option<SearchTerm>,
    ) -> Result<Vec<WorkerSummary>, WorkerRepositoryError>;

    /// Delete a worker and, through the store's cascade, their visits.
    async fn delete(&self, identifier: &WorkerIdentifier) -> Result<bool, WorkerRepositoryError>;

    /// Number of registered workers.
    async fn count(&self) -> Result<u64, WorkerRepositoryError>;
}

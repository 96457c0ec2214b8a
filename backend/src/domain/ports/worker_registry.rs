//! Driving port for worker registration and lookup.

use async_trait::async_trait;

use crate::domain::{
    Actor, Error, SearchTerm, Worker, WorkerIdentifier, WorkerRegistration, WorkerSummary,
};

/// Domain use-case port for the worker registry.
#[async_trait]
pub trait WorkerRegistry: Send + Sync {
    /// Register a worker and issue their identifier. Admin only.
    async fn register(&self, actor: &Actor, registration: WorkerRegistration)
    -> Result<Worker, Error>;

    /// Workers newest first with visit counts. Admin only.
    async fn list(&self, actor: &Actor, search: Option<SearchTerm>)
    -> Result<Vec<WorkerSummary>, Error>;

    /// Resolve a scanned or typed identifier. Fails with `worker_not_found`.
    async fn find(&self, actor: &Actor, identifier: &WorkerIdentifier) -> Result<Worker, Error>;

    /// Delete a worker and their visit history. Admin only.
    async fn remove(&self, actor: &Actor, identifier: &WorkerIdentifier) -> Result<(), Error>;
}

//! Worker registration, lookup and removal.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::ports::{WorkerRegistry, WorkerRepository};
use super::repository_errors::{map_worker_error, worker_not_found};
use super::{
    Actor, Error, NewWorker, Role, SearchTerm, Worker, WorkerIdentifier, WorkerRegistration,
    WorkerSummary,
};

/// Worker registry over the worker repository.
#[derive(Clone)]
pub struct WorkerRegistryService<W> {
    workers: Arc<W>,
}

impl<W> WorkerRegistryService<W> {
    /// Create a registry service.
    pub fn new(workers: Arc<W>) -> Self {
        Self { workers }
    }
}

#[async_trait]
impl<W> WorkerRegistry for WorkerRegistryService<W>
where
    W: WorkerRepository,
{
    async fn register(
        &self,
        actor: &Actor,
        registration: WorkerRegistration,
    ) -> Result<Worker, Error> {
        actor.require(Role::Admin)?;
        let identifier = self
            .workers
            .next_identifier()
            .await
            .map_err(map_worker_error)?;
        let worker = self
            .workers
            .insert(&NewWorker {
                identifier,
                registration,
                registered_by: *actor.account_id(),
            })
            .await
            .map_err(map_worker_error)?;
        info!(worker_id = %worker.identifier, "worker registered");
        Ok(worker)
    }

    async fn list(
        &self,
        actor: &Actor,
        search: Option<SearchTerm>,
    ) -> Result<Vec<WorkerSummary>, Error> {
        actor.require(Role::Admin)?;
        self.workers.list(search).await.map_err(map_worker_error)
    }

    async fn find(&self, actor: &Actor, identifier: &WorkerIdentifier) -> Result<Worker, Error> {
        actor.require_any(&[Role::Admin, Role::Doctor])?;
        self.workers
            .find_by_identifier(identifier)
            .await
            .map_err(map_worker_error)?
            .ok_or_else(worker_not_found)
    }

    async fn remove(&self, actor: &Actor, identifier: &WorkerIdentifier) -> Result<(), Error> {
        actor.require(Role::Admin)?;
        let deleted = self
            .workers
            .delete(identifier)
            .await
            .map_err(map_worker_error)?;
        if !deleted {
            return Err(worker_not_found());
        }
        info!(worker_id = %identifier, "worker deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "worker_registry_service_tests.rs"]
mod tests;

//! Visit recording and history reads.
//!
//! Recording requires an authenticated doctor and a worker resolved by
//! identifier. Reads go straight to the store, so a visit appears in the
//! next history query without any cache to invalidate.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::ports::{VisitRecords, VisitRepository, WorkerRepository};
use super::repository_errors::{map_visit_error, map_worker_error, worker_not_found};
use super::{
    Actor, Error, NewVisit, Role, SearchTerm, Visit, VisitSubmission, VisitValidationError,
    VisitWithWorker, Worker, WorkerHistory, WorkerIdentifier,
};

fn map_validation_error(error: &VisitValidationError) -> Error {
    let field = match error {
        VisitValidationError::MissingField { field } | VisitValidationError::TooLong { field, .. } => {
            *field
        }
    };
    let code = match error {
        VisitValidationError::MissingField { .. } => "missing_field",
        VisitValidationError::TooLong { .. } => "too_long",
    };
    Error::invalid_request(error.to_string())
        .with_details(serde_json::json!({ "field": field, "code": code }))
}

/// Visit record service over the worker and visit repositories.
#[derive(Clone)]
pub struct VisitRecordsService<W, V> {
    workers: Arc<W>,
    visits: Arc<V>,
    clock: Arc<dyn Clock>,
}

impl<W, V> VisitRecordsService<W, V> {
    /// Create a visit record service. `clock` supplies the default visit date.
    pub fn new(workers: Arc<W>, visits: Arc<V>, clock: Arc<dyn Clock>) -> Self {
        Self {
            workers,
            visits,
            clock,
        }
    }
}

impl<W, V> VisitRecordsService<W, V>
where
    W: WorkerRepository,
{
    async fn resolve_worker(&self, identifier: &WorkerIdentifier) -> Result<Worker, Error> {
        self.workers
            .find_by_identifier(identifier)
            .await
            .map_err(map_worker_error)?
            .ok_or_else(worker_not_found)
    }
}

#[async_trait]
impl<W, V> VisitRecords for VisitRecordsService<W, V>
where
    W: WorkerRepository,
    V: VisitRepository,
{
    async fn record_visit(
        &self,
        actor: &Actor,
        identifier: &WorkerIdentifier,
        submission: VisitSubmission,
    ) -> Result<Visit, Error> {
        actor.require(Role::Doctor)?;
        let worker = self.resolve_worker(identifier).await?;
        let draft = submission
            .into_draft(self.clock.utc().date_naive())
            .map_err(|err| map_validation_error(&err))?;

        let visit = self
            .visits
            .insert(&NewVisit {
                worker_id: worker.id,
                doctor_id: *actor.account_id(),
                draft,
            })
            .await
            .map_err(map_visit_error)?;
        info!(
            worker_id = %worker.identifier,
            doctor_id = %actor.account_id(),
            visit_id = %visit.id,
            "visit recorded"
        );
        Ok(visit)
    }

    async fn history(
        &self,
        actor: &Actor,
        identifier: &WorkerIdentifier,
    ) -> Result<WorkerHistory, Error> {
        actor.require_any(&[Role::Admin, Role::Doctor])?;
        let worker = self.resolve_worker(identifier).await?;
        let visits = self
            .visits
            .list_for_worker(worker.id)
            .await
            .map_err(map_visit_error)?;
        Ok(WorkerHistory { worker, visits })
    }

    async fn authored_visits(
        &self,
        actor: &Actor,
        search: Option<SearchTerm>,
    ) -> Result<Vec<VisitWithWorker>, Error> {
        actor.require(Role::Doctor)?;
        self.visits
            .list_authored(actor.account_id(), search)
            .await
            .map_err(map_visit_error)
    }
}

#[cfg(test)]
#[path = "visit_records_service_tests.rs"]
mod tests;

//! Driving port for recording and reading visits.

use async_trait::async_trait;

use crate::domain::{
    Actor, Error, SearchTerm, Visit, VisitSubmission, VisitWithWorker, WorkerHistory,
    WorkerIdentifier,
};

/// Domain use-case port for visit records.
#[async_trait]
pub trait VisitRecords: Send + Sync {
    /// Append a visit for the worker. Doctor only.
    async fn record_visit(
        &self,
        actor: &Actor,
        identifier: &WorkerIdentifier,
        submission: VisitSubmission,
    ) -> Result<Visit, Error>;

    /// Worker with their visits, newest visit date first.
    async fn history(&self, actor: &Actor, identifier: &WorkerIdentifier)
    -> Result<WorkerHistory, Error>;

    /// Visits authored by the calling doctor.
    async fn authored_visits(
        &self,
        actor: &Actor,
        search: Option<SearchTerm>,
    ) -> Result<Vec<VisitWithWorker>, Error>;
}

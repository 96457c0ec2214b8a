//! Port for the append-only visit record store.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{
    AccountId, AuthoredVisit, NewVisit, SearchTerm, Visit, VisitScope, VisitWithWorker,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by visit repository adapters.
    pub enum VisitRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "visit repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "visit repository query failed: {message}",
        /// The referenced worker disappeared before the insert.
        MissingWorker { message: String } =>
            "visit references a missing worker: {message}",
    }
}

/// Port over visit records. There is no update or delete operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Append a visit.
    async fn insert(&self, visit: &NewVisit) -> Result<Visit, VisitRepositoryError>;

    /// A worker's visits by visit date, newest first, with author names.
    async fn list_for_worker(
        &self,
        worker_id: Uuid,
    ) -> Result<Vec<AuthoredVisit>, VisitRepositoryError>;

    /// Visits authored by `doctor` by visit date, newest first.
    ///
    /// The search matches worker name, worker identifier or diagnosis.
    async fn list_authored(
        &self,
        doctor: &AccountId,
        search: Option<SearchTerm>,
    ) -> Result<Vec<VisitWithWorker>, VisitRepositoryError>;

    /// Most recently created visits within `scope`.
    async fn recent(
        &self,
        scope: VisitScope,
        limit: u32,
    ) -> Result<Vec<VisitWithWorker>, VisitRepositoryError>;

    /// Number of visits within `scope`, optionally dated on or after `since`.
    async fn count(
        &self,
        scope: VisitScope,
        since: Option<NaiveDate>,
    ) -> Result<u64, VisitRepositoryError>;
}

//! Role dashboards assembled from independent concurrent reads.

use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::warn;

use super::ports::{AccountRepository, DashboardQuery, VisitRepository, WorkerRepository};
use super::{
    Actor, AdminOverview, DoctorOverview, Error, RECENT_VISIT_LIMIT, Role, VisitScope,
    VisitWithWorker,
};

fn settle<T, E: Display>(result: Result<T, E>, what: &'static str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(stat = what, error = %err, "dashboard read failed");
            None
        }
    }
}

fn settle_list<E: Display>(
    result: Result<Vec<VisitWithWorker>, E>,
    what: &'static str,
) -> Vec<VisitWithWorker> {
    settle(result, what).unwrap_or_default()
}

/// Dashboard query over the account, worker and visit repositories.
#[derive(Clone)]
pub struct DashboardService<A, W, V> {
    accounts: Arc<A>,
    workers: Arc<W>,
    visits: Arc<V>,
    clock: Arc<dyn Clock>,
}

impl<A, W, V> DashboardService<A, W, V> {
    /// Create a dashboard service. `clock` decides what "today" means.
    pub fn new(accounts: Arc<A>, workers: Arc<W>, visits: Arc<V>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            workers,
            visits,
            clock,
        }
    }
}

#[async_trait]
impl<A, W, V> DashboardQuery for DashboardService<A, W, V>
where
    A: AccountRepository,
    W: WorkerRepository,
    V: VisitRepository,
{
    async fn admin_overview(&self, actor: &Actor) -> Result<AdminOverview, Error> {
        actor.require(Role::Admin)?;
        let (workers, doctors, visits, recent) = tokio::join!(
            self.workers.count(),
            self.accounts.count_with_role(Role::Doctor),
            self.visits.count(VisitScope::All, None),
            self.visits.recent(VisitScope::All, RECENT_VISIT_LIMIT),
        );
        Ok(AdminOverview {
            workers: settle(workers, "workers"),
            doctors: settle(doctors, "doctors"),
            visits: settle(visits, "visits"),
            recent_visits: settle_list(recent, "recent_visits"),
        })
    }

    async fn doctor_overview(&self, actor: &Actor) -> Result<DoctorOverview, Error> {
        actor.require(Role::Doctor)?;
        let scope = VisitScope::AuthoredBy(*actor.account_id());
        let today = self.clock.utc().date_naive();
        let (mine, today_count, workers, recent) = tokio::join!(
            self.visits.count(scope, None),
            self.visits.count(scope, Some(today)),
            self.workers.count(),
            self.visits.recent(scope, RECENT_VISIT_LIMIT),
        );
        Ok(DoctorOverview {
            my_visits: settle(mine, "my_visits"),
            today_visits: settle(today_count, "today_visits"),
            total_workers: settle(workers, "total_workers"),
            recent_visits: settle_list(recent, "recent_visits"),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{
        MockAccountRepository, MockVisitRepository, MockWorkerRepository, VisitRepositoryError,
        WorkerRepositoryError,
    };
    use crate::domain::{AccountId, ErrorCode};
    use crate::test_support::MutableClock;

    fn service(
        accounts: MockAccountRepository,
        workers: MockWorkerRepository,
        visits: MockVisitRepository,
    ) -> DashboardService<MockAccountRepository, MockWorkerRepository, MockVisitRepository> {
        let now = Utc
            .with_ymd_and_hms(2026, 5, 20, 23, 30, 0)
            .single()
            .expect("valid timestamp");
        DashboardService::new(
            Arc::new(accounts),
            Arc::new(workers),
            Arc::new(visits),
            Arc::new(MutableClock::new(now)),
        )
    }

    #[tokio::test]
    async fn admin_overview_survives_a_failed_count() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_count_with_role()
            .withf(|role| *role == Role::Doctor)
            .return_once(|_| Ok(3));
        let mut workers = MockWorkerRepository::new();
        workers
            .expect_count()
            .return_once(|| Err(WorkerRepositoryError::connection("pool closed")));
        let mut visits = MockVisitRepository::new();
        visits
            .expect_count()
            .withf(|scope, since| *scope == VisitScope::All && since.is_none())
            .return_once(|_, _| Ok(11));
        visits
            .expect_recent()
            .withf(|scope, limit| *scope == VisitScope::All && *limit == RECENT_VISIT_LIMIT)
            .return_once(|_, _| Ok(Vec::new()));

        let admin = Actor::new(AccountId::random(), Role::Admin);
        let overview = service(accounts, workers, visits)
            .admin_overview(&admin)
            .await
            .expect("overview");
        assert_eq!(overview.workers, None);
        assert_eq!(overview.doctors, Some(3));
        assert_eq!(overview.visits, Some(11));
    }

    #[tokio::test]
    async fn doctor_overview_scopes_counts_to_caller() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 20).expect("valid date");
        let doctor = Actor::new(AccountId::random(), Role::Doctor);
        let scope = VisitScope::AuthoredBy(*doctor.account_id());
        let mut workers = MockWorkerRepository::new();
        workers.expect_count().return_once(|| Ok(40));
        let mut visits = MockVisitRepository::new();
        visits
            .expect_count()
            .withf(move |s, since| *s == scope && since.is_none())
            .return_once(|_, _| Ok(9));
        visits
            .expect_count()
            .withf(move |s, since| *s == scope && *since == Some(today))
            .return_once(|_, _| Ok(2));
        visits
            .expect_recent()
            .return_once(|_, _| Err(VisitRepositoryError::query("timeout")));

        let overview = service(MockAccountRepository::new(), workers, visits)
            .doctor_overview(&doctor)
            .await
            .expect("overview");
        assert_eq!(overview.my_visits, Some(9));
        assert_eq!(overview.today_visits, Some(2));
        assert_eq!(overview.total_workers, Some(40));
        assert!(overview.recent_visits.is_empty());
    }

    #[rstest]
    #[case(Role::Doctor, true)]
    #[case(Role::Admin, false)]
    #[tokio::test]
    async fn dashboards_are_role_specific(#[case] role: Role, #[case] admin_view: bool) {
        let actor = Actor::new(AccountId::random(), role);
        let svc = service(
            MockAccountRepository::new(),
            MockWorkerRepository::new(),
            MockVisitRepository::new(),
        );
        let err = if admin_view {
            svc.admin_overview(&actor).await.expect_err("forbidden")
        } else {
            svc.doctor_overview(&actor).await.expect_err("forbidden")
        };
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}

//! PostgreSQL-backed `WorkerRepository` implementation using Diesel ORM.
//!
//! Identifiers come from the `worker_id_seq` sequence so concurrent
//! registrations never collide. Deleting a worker relies on the
//! `ON DELETE CASCADE` foreign key to remove their visits.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::RunQueryDsl;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{WorkerRepository, WorkerRepositoryError};
use crate::domain::{NewWorker, SearchTerm, Worker, WorkerIdentifier, WorkerSummary};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewWorkerRow, WorkerRow, count_from_db};
use super::pool::{DbPool, PoolError};
use super::schema::{medical_visits, workers};

/// Diesel-backed worker repository.
#[derive(Clone)]
pub struct DieselWorkerRepository {
    pool: DbPool,
}

impl DieselWorkerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> WorkerRepositoryError {
    map_basic_pool_error(error, WorkerRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> WorkerRepositoryError {
    map_basic_diesel_error(
        error,
        WorkerRepositoryError::query,
        WorkerRepositoryError::connection,
    )
}

fn to_worker(row: WorkerRow) -> Result<Worker, WorkerRepositoryError> {
    row.into_worker().map_err(WorkerRepositoryError::query)
}

#[async_trait]
impl WorkerRepository for DieselWorkerRepository {
    async fn next_identifier(&self) -> Result<WorkerIdentifier, WorkerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let value: i64 = diesel::select(diesel::dsl::sql::<BigInt>("nextval('worker_id_seq')"))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let value = u64::try_from(value)
            .map_err(|_| WorkerRepositoryError::query("worker sequence returned a negative value"))?;
        Ok(WorkerIdentifier::from_sequence(value))
    }

    async fn insert(&self, worker: &NewWorker) -> Result<Worker, WorkerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewWorkerRow {
            id: Uuid::new_v4(),
            worker_id: worker.identifier.as_str(),
            full_name: worker.registration.full_name.as_str(),
            age: i16::from(worker.registration.age.years()),
            gender: worker.registration.gender.as_str(),
            registered_by: Some(*worker.registered_by.as_uuid()),
        };

        let stored: WorkerRow = diesel::insert_into(workers::table)
            .values(&row)
            .returning(WorkerRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| match constraint_violation(&err) {
                Some(ConstraintViolation::Unique) => {
                    WorkerRepositoryError::duplicate_identifier(worker.identifier.as_str())
                }
                _ => map_diesel_error(err),
            })?;

        info!(worker_id = %stored.worker_id, "worker row inserted");
        to_worker(stored)
    }

    async fn find_by_identifier(
        &self,
        identifier: &WorkerIdentifier,
    ) -> Result<Option<Worker>, WorkerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<WorkerRow> = workers::table
            .filter(workers::worker_id.eq(identifier.as_str()))
            .select(WorkerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_worker).transpose()
    }

    async fn list(
        &self,
        search: Option<SearchTerm>,
    ) -> Result<Vec<WorkerSummary>, WorkerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = workers::table
            .select(WorkerRow::as_select())
            .order(workers::created_at.desc())
            .into_boxed();
        if let Some(term) = search {
            let pattern = term.like_pattern();
            query = query.filter(
                workers::full_name
                    .ilike(pattern.clone())
                    .or(workers::worker_id.ilike(pattern)),
            );
        }
        let rows: Vec<WorkerRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let counts: HashMap<Uuid, i64> = medical_visits::table
            .filter(medical_visits::worker_id.eq_any(&ids))
            .group_by(medical_visits::worker_id)
            .select((medical_visits::worker_id, count_star()))
            .load::<(Uuid, i64)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .collect();

        rows.into_iter()
            .map(|row| {
                let visit_count = counts.get(&row.id).copied().map_or(0, count_from_db);
                to_worker(row).map(|worker| WorkerSummary {
                    worker,
                    visit_count,
                })
            })
            .collect()
    }

    async fn delete(&self, identifier: &WorkerIdentifier) -> Result<bool, WorkerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(workers::table.filter(workers::worker_id.eq(identifier.as_str())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn count(&self) -> Result<u64, WorkerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = workers::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_from_db(count))
    }
}

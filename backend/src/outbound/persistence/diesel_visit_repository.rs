//! PostgreSQL-backed `VisitRepository` implementation using Diesel ORM.
//!
//! Visits are append-only. Author names come from a left join on
//! `profiles`, so a visit whose doctor lost their profile still loads and
//! reports an unknown author.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{VisitRepository, VisitRepositoryError};
use crate::domain::{
    AccountId, AuthoredVisit, NewVisit, SearchTerm, Visit, VisitScope, VisitWithWorker,
    WorkerBrief,
};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewVisitRow, VisitRow, WorkerRow, count_from_db};
use super::pool::{DbPool, PoolError};
use super::schema::{medical_visits, profiles, workers};

/// Diesel-backed visit repository.
#[derive(Clone)]
pub struct DieselVisitRepository {
    pool: DbPool,
}

impl DieselVisitRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> VisitRepositoryError {
    map_basic_pool_error(error, VisitRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> VisitRepositoryError {
    map_basic_diesel_error(
        error,
        VisitRepositoryError::query,
        VisitRepositoryError::connection,
    )
}

fn row_to_visit(row: VisitRow) -> Visit {
    Visit {
        id: row.id,
        worker_id: row.worker_id,
        doctor_id: AccountId::from_uuid(row.doctor_id),
        visit_date: row.visit_date,
        symptoms: row.symptoms,
        diagnosis: row.diagnosis,
        notes: row.notes,
        created_at: row.created_at,
    }
}

fn rows_to_visit_with_worker(
    (visit, worker): (VisitRow, WorkerRow),
) -> Result<VisitWithWorker, VisitRepositoryError> {
    let worker = worker
        .into_worker()
        .map_err(VisitRepositoryError::query)?;
    Ok(VisitWithWorker {
        visit: row_to_visit(visit),
        worker: WorkerBrief {
            identifier: worker.identifier,
            full_name: worker.full_name.as_str().to_owned(),
            age: worker.age,
            gender: worker.gender,
        },
    })
}

#[async_trait]
impl VisitRepository for DieselVisitRepository {
    async fn insert(&self, visit: &NewVisit) -> Result<Visit, VisitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewVisitRow {
            id: Uuid::new_v4(),
            worker_id: visit.worker_id,
            doctor_id: *visit.doctor_id.as_uuid(),
            visit_date: visit.draft.visit_date(),
            symptoms: visit.draft.symptoms(),
            diagnosis: visit.draft.diagnosis(),
            notes: visit.draft.notes(),
        };

        let stored: VisitRow = diesel::insert_into(medical_visits::table)
            .values(&row)
            .returning(VisitRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| match constraint_violation(&err) {
                Some(ConstraintViolation::ForeignKey) => {
                    VisitRepositoryError::missing_worker(visit.worker_id.to_string())
                }
                _ => map_diesel_error(err),
            })?;
        Ok(row_to_visit(stored))
    }

    async fn list_for_worker(
        &self,
        worker_id: Uuid,
    ) -> Result<Vec<AuthoredVisit>, VisitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(VisitRow, Option<String>)> = medical_visits::table
            .left_join(profiles::table.on(profiles::user_id.eq(medical_visits::doctor_id)))
            .filter(medical_visits::worker_id.eq(worker_id))
            .order((
                medical_visits::visit_date.desc(),
                medical_visits::created_at.desc(),
            ))
            .select((VisitRow::as_select(), profiles::full_name.nullable()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(visit, doctor_name)| AuthoredVisit {
                visit: row_to_visit(visit),
                doctor_name,
            })
            .collect())
    }

    async fn list_authored(
        &self,
        doctor: &AccountId,
        search: Option<SearchTerm>,
    ) -> Result<Vec<VisitWithWorker>, VisitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = medical_visits::table
            .inner_join(workers::table)
            .filter(medical_visits::doctor_id.eq(doctor.as_uuid()))
            .order((
                medical_visits::visit_date.desc(),
                medical_visits::created_at.desc(),
            ))
            .select((VisitRow::as_select(), WorkerRow::as_select()))
            .into_boxed();

        if let Some(term) = search {
            let pattern = term.like_pattern();
            query = query.filter(
                workers::full_name
                    .ilike(pattern.clone())
                    .or(workers::worker_id.ilike(pattern.clone()))
                    .or(medical_visits::diagnosis.ilike(pattern)),
            );
        }

        let rows: Vec<(VisitRow, WorkerRow)> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(rows_to_visit_with_worker).collect()
    }

    async fn recent(
        &self,
        scope: VisitScope,
        limit: u32,
    ) -> Result<Vec<VisitWithWorker>, VisitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = medical_visits::table
            .inner_join(workers::table)
            .order(medical_visits::created_at.desc())
            .limit(i64::from(limit))
            .select((VisitRow::as_select(), WorkerRow::as_select()))
            .into_boxed();
        if let VisitScope::AuthoredBy(doctor) = scope {
            query = query.filter(medical_visits::doctor_id.eq(*doctor.as_uuid()));
        }

        let rows: Vec<(VisitRow, WorkerRow)> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(rows_to_visit_with_worker).collect()
    }

    async fn count(
        &self,
        scope: VisitScope,
        since: Option<NaiveDate>,
    ) -> Result<u64, VisitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = medical_visits::table.count().into_boxed();
        if let VisitScope::AuthoredBy(doctor) = scope {
            query = query.filter(medical_visits::doctor_id.eq(*doctor.as_uuid()));
        }
        if let Some(day) = since {
            query = query.filter(medical_visits::visit_date.ge(day));
        }
        let count: i64 = query.get_result(&mut conn).await.map_err(map_diesel_error)?;
        Ok(count_from_db(count))
    }
}

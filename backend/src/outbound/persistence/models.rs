//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversion into domain types happens in
//! the repository modules, where invalid stored values surface as query
//! errors instead of panics.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{AccountId, Age, FullName, Gender, Worker, WorkerIdentifier};

use super::schema::{accounts, access_tokens, medical_visits, profiles, user_roles, workers};

/// Convert a `COUNT(*)` result; Postgres never returns a negative count.
pub(crate) fn count_from_db(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Insertable login identity.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Insertable profile.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub user_id: Uuid,
    pub full_name: &'a str,
}

/// Insertable role assignment.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_roles)]
pub(crate) struct NewRoleRow<'a> {
    pub user_id: Uuid,
    pub role: &'a str,
}

/// Profile joined with its account and optional role.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub full_name: String,
    pub role: Option<String>,
}

/// Insertable token digest.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = access_tokens)]
pub(crate) struct NewAccessTokenRow<'a> {
    pub digest: &'a [u8],
    pub account_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Row struct for reading from the workers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WorkerRow {
    pub id: Uuid,
    pub worker_id: String,
    pub full_name: String,
    pub age: i16,
    pub gender: String,
    pub registered_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl WorkerRow {
    /// Validate the stored columns back into a domain worker.
    ///
    /// The error is a human-readable description of the offending column.
    pub(crate) fn into_worker(self) -> Result<Worker, String> {
        let identifier = WorkerIdentifier::new(&self.worker_id)
            .map_err(|err| format!("stored worker id: {err}"))?;
        let full_name =
            FullName::new(&self.full_name).map_err(|err| format!("stored worker name: {err}"))?;
        let years = u8::try_from(self.age).map_err(|err| format!("stored age: {err}"))?;
        let age = Age::new(years).map_err(|err| format!("stored age: {err}"))?;
        let gender = self
            .gender
            .parse::<Gender>()
            .map_err(|err| format!("stored gender: {err}"))?;
        Ok(Worker {
            id: self.id,
            identifier,
            full_name,
            age,
            gender,
            registered_by: self.registered_by.map(AccountId::from_uuid),
            registered_at: self.created_at,
        })
    }
}

/// Insertable worker.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workers)]
pub(crate) struct NewWorkerRow<'a> {
    pub id: Uuid,
    pub worker_id: &'a str,
    pub full_name: &'a str,
    pub age: i16,
    pub gender: &'a str,
    pub registered_by: Option<Uuid>,
}

/// Row struct for reading from the medical_visits table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = medical_visits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VisitRow {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub doctor_id: Uuid,
    pub visit_date: NaiveDate,
    pub symptoms: String,
    pub diagnosis: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable visit.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = medical_visits)]
pub(crate) struct NewVisitRow<'a> {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub doctor_id: Uuid,
    pub visit_date: NaiveDate,
    pub symptoms: &'a str,
    pub diagnosis: &'a str,
    pub notes: Option<&'a str>,
}

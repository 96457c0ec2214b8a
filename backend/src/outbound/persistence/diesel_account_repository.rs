//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Accounts, profiles and role assignments live in three tables keyed by the
//! account id. Passwords are hashed off the async runtime before they reach
//! the database; only the encoded hash is ever stored.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{
    AccountId, AccountProfile, Email, FullName, LoginCredentials, Password, Role, SearchTerm,
};
use crate::outbound::password::PasswordHasher;

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewAccountRow, NewProfileRow, NewRoleRow, ProfileRow, count_from_db};
use super::pool::{DbPool, PoolError};
use super::schema::{accounts, profiles, user_roles};

/// Diesel-backed account repository.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
    hasher: PasswordHasher,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool, hasher: PasswordHasher) -> Self {
        Self { pool, hasher }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    map_basic_pool_error(error, AccountRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_basic_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn parse_role(raw: &str) -> Result<Role, AccountRepositoryError> {
    raw.parse::<Role>()
        .map_err(|err| AccountRepositoryError::query(err.to_string()))
}

fn row_to_profile(row: ProfileRow) -> Result<AccountProfile, AccountRepositoryError> {
    let email = Email::new(&row.email)
        .map_err(|err| AccountRepositoryError::query(format!("stored email: {err}")))?;
    let full_name = FullName::new(&row.full_name)
        .map_err(|err| AccountRepositoryError::query(format!("stored name: {err}")))?;
    let role = row.role.as_deref().map(parse_role).transpose()?;
    Ok(AccountProfile {
        id: AccountId::from_uuid(row.id),
        email,
        full_name,
        role,
        created_at: row.created_at,
    })
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn create_identity(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<AccountId, AccountRepositoryError> {
        let password_hash = self
            .hasher
            .hash_blocking(password.clone())
            .await
            .map_err(|err| AccountRepositoryError::query(err.to_string()))?;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = Uuid::new_v4();
        let row = NewAccountRow {
            id,
            email: email.as_str(),
            password_hash: &password_hash,
        };

        diesel::insert_into(accounts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| match constraint_violation(&err) {
                Some(ConstraintViolation::Unique) => {
                    AccountRepositoryError::duplicate_email(email.as_str())
                }
                _ => map_diesel_error(err),
            })?;

        Ok(AccountId::from_uuid(id))
    }

    async fn delete_identity(&self, id: &AccountId) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(accounts::table.filter(accounts::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn insert_profile(
        &self,
        id: &AccountId,
        full_name: &FullName,
    ) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewProfileRow {
            user_id: *id.as_uuid(),
            full_name: full_name.as_str(),
        };
        diesel::insert_into(profiles::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn assign_role(&self, id: &AccountId, role: Role) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewRoleRow {
            user_id: *id.as_uuid(),
            role: role.as_str(),
        };
        diesel::insert_into(user_roles::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn verify_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<AccountId>, AccountRepositoryError> {
        let stored: Option<(Uuid, String)> = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            accounts::table
                .filter(accounts::email.eq(credentials.email().as_str()))
                .select((accounts::id, accounts::password_hash))
                .first(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?
        };

        let Some((id, encoded)) = stored else {
            return Ok(None);
        };
        let verified = self
            .hasher
            .verify_blocking(credentials.password().clone(), encoded)
            .await
            .map_err(|err| AccountRepositoryError::query(err.to_string()))?;
        Ok(verified.then(|| AccountId::from_uuid(id)))
    }

    async fn find_profile(
        &self,
        id: &AccountId,
    ) -> Result<Option<AccountProfile>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProfileRow> = accounts::table
            .inner_join(profiles::table)
            .left_join(user_roles::table)
            .filter(accounts::id.eq(id.as_uuid()))
            .select((
                accounts::id,
                accounts::email,
                accounts::created_at,
                profiles::full_name,
                user_roles::role.nullable(),
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_profile).transpose()
    }

    async fn role_of(&self, id: &AccountId) -> Result<Option<Role>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let role: Option<String> = user_roles::table
            .filter(user_roles::user_id.eq(id.as_uuid()))
            .select(user_roles::role)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        role.as_deref().map(parse_role).transpose()
    }

    async fn any_with_role(&self, role: Role) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            user_roles::table.filter(user_roles::role.eq(role.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn list_with_role(
        &self,
        role: Role,
        search: Option<SearchTerm>,
    ) -> Result<Vec<AccountProfile>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = accounts::table
            .inner_join(profiles::table)
            .inner_join(user_roles::table)
            .filter(user_roles::role.eq(role.as_str()))
            .select((
                accounts::id,
                accounts::email,
                accounts::created_at,
                profiles::full_name,
                user_roles::role.nullable(),
            ))
            .order(accounts::created_at.desc())
            .into_boxed();

        if let Some(term) = search {
            let pattern = term.like_pattern();
            query = query.filter(
                profiles::full_name
                    .ilike(pattern.clone())
                    .or(accounts::email.ilike(pattern)),
            );
        }

        let rows: Vec<ProfileRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_profile).collect()
    }

    async fn count_with_role(&self, role: Role) -> Result<u64, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = user_roles::table
            .filter(user_roles::role.eq(role.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_from_db(count))
    }

    async fn revoke_role(&self, id: &AccountId, role: Role) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *id.as_uuid();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let removed = diesel::delete(
                    user_roles::table
                        .filter(user_roles::user_id.eq(user_id))
                        .filter(user_roles::role.eq(role.as_str())),
                )
                .execute(conn)
                .await?;
                if removed == 0 {
                    return Ok(false);
                }
                diesel::delete(profiles::table.filter(profiles::user_id.eq(user_id)))
                    .execute(conn)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

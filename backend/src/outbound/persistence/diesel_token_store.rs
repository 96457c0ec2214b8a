//! PostgreSQL-backed `TokenStore`.
//!
//! Only SHA-256 digests are persisted, so a leaked table cannot be replayed
//! as bearer credentials. Expired rows are pruned lazily on resolve.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{TokenStore, TokenStoreError};
use crate::domain::{AccountId, TokenDigest};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewAccessTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::access_tokens;

/// Diesel-backed token store.
#[derive(Clone)]
pub struct DieselTokenStore {
    pool: DbPool,
}

impl DieselTokenStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TokenStoreError {
    map_basic_pool_error(error, TokenStoreError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TokenStoreError {
    map_basic_diesel_error(error, TokenStoreError::query, TokenStoreError::connection)
}

#[async_trait]
impl TokenStore for DieselTokenStore {
    async fn store(
        &self,
        digest: &TokenDigest,
        account: &AccountId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAccessTokenRow {
            digest: digest.as_bytes(),
            account_id: *account.as_uuid(),
            expires_at,
        };
        diesel::insert_into(access_tokens::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn resolve(
        &self,
        digest: &TokenDigest,
        now: DateTime<Utc>,
    ) -> Result<Option<AccountId>, TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let pruned = diesel::delete(access_tokens::table.filter(access_tokens::expires_at.le(now)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if pruned > 0 {
            debug!(pruned, "removed expired access tokens");
        }

        let account: Option<Uuid> = access_tokens::table
            .filter(access_tokens::digest.eq(&digest.as_bytes()[..]))
            .select(access_tokens::account_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(account.map(AccountId::from_uuid))
    }

    async fn revoke(&self, digest: &TokenDigest) -> Result<(), TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(access_tokens::table.filter(access_tokens::digest.eq(&digest.as_bytes()[..])))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn revoke_all(&self, account: &AccountId) -> Result<(), TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(access_tokens::table.filter(access_tokens::account_id.eq(account.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}

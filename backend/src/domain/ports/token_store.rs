//! Port for issued bearer token digests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AccountId, TokenDigest};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token store adapters.
    pub enum TokenStoreError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "token store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "token store query failed: {message}",
    }
}

/// Storage for digests of issued access tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Record a digest for `account`, valid until `expires_at`.
    async fn store(
        &self,
        digest: &TokenDigest,
        account: &AccountId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenStoreError>;

    /// Account owning an unexpired digest.
    async fn resolve(
        &self,
        digest: &TokenDigest,
        now: DateTime<Utc>,
    ) -> Result<Option<AccountId>, TokenStoreError>;

    /// Forget one digest.
    async fn revoke(&self, digest: &TokenDigest) -> Result<(), TokenStoreError>;

    /// Forget every digest issued to `account`.
    async fn revoke_all(&self, account: &AccountId) -> Result<(), TokenStoreError>;
}

//! Admin-facing doctor directory.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::ports::{AccountRepository, DoctorDirectory, TokenStore};
use super::repository_errors::{map_account_error, map_token_error};
use super::{AccountId, AccountProfile, Actor, Error, Role, SearchTerm};

/// Doctor directory over the account repository and token store.
#[derive(Clone)]
pub struct DoctorDirectoryService<A, T> {
    accounts: Arc<A>,
    tokens: Arc<T>,
}

impl<A, T> DoctorDirectoryService<A, T> {
    /// Create a directory service.
    pub fn new(accounts: Arc<A>, tokens: Arc<T>) -> Self {
        Self { accounts, tokens }
    }
}

#[async_trait]
impl<A, T> DoctorDirectory for DoctorDirectoryService<A, T>
where
    A: AccountRepository,
    T: TokenStore,
{
    async fn list_doctors(
        &self,
        actor: &Actor,
        search: Option<SearchTerm>,
    ) -> Result<Vec<AccountProfile>, Error> {
        actor.require(Role::Admin)?;
        self.accounts
            .list_with_role(Role::Doctor, search)
            .await
            .map_err(map_account_error)
    }

    async fn remove_doctor(&self, actor: &Actor, doctor: &AccountId) -> Result<(), Error> {
        actor.require(Role::Admin)?;
        let removed = self
            .accounts
            .revoke_role(doctor, Role::Doctor)
            .await
            .map_err(map_account_error)?;
        if !removed {
            return Err(Error::not_found("Doctor not found"));
        }
        self.tokens
            .revoke_all(doctor)
            .await
            .map_err(map_token_error)?;
        info!(doctor_id = %doctor, removed_by = %actor.account_id(), "doctor removed");
        Ok(())
    }
}

//! Bearer-token authentication service.
//!
//! Implements [`AuthService`] over the account repository and token store.
//! The role is looked up on every [`AuthService::authenticate`] call, so a
//! revoked doctor loses access on their next request even while holding an
//! unexpired token.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use tracing::info;

use super::ports::{AccountRepository, AuthService, TokenStore};
use super::repository_errors::{map_account_error, map_token_error};
use super::{AccessToken, AccountProfile, Actor, Error, LoginCredentials, Session};

/// Default lifetime of an issued token.
pub const DEFAULT_TOKEN_TTL: TimeDelta = TimeDelta::hours(12);

/// Authentication service backed by hashed bearer tokens.
#[derive(Clone)]
pub struct TokenAuthService<A, T> {
    accounts: Arc<A>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
}

impl<A, T> TokenAuthService<A, T> {
    /// Create a service issuing tokens valid for `ttl`.
    pub fn new(accounts: Arc<A>, tokens: Arc<T>, clock: Arc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self {
            accounts,
            tokens,
            clock,
            ttl,
        }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

#[async_trait]
impl<A, T> AuthService for TokenAuthService<A, T>
where
    A: AccountRepository,
    T: TokenStore,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error> {
        let account_id = self
            .accounts
            .verify_credentials(credentials)
            .await
            .map_err(map_account_error)?
            .ok_or_else(invalid_credentials)?;

        let profile = self
            .accounts
            .find_profile(&account_id)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::forbidden("account is not active"))?;
        if profile.role.is_none() {
            return Err(Error::forbidden("account has no role assigned"));
        }

        let token = AccessToken::generate();
        let expires_at = self.clock.utc() + self.ttl;
        self.tokens
            .store(&token.digest(), &account_id, expires_at)
            .await
            .map_err(map_token_error)?;

        info!(account_id = %account_id, "issued access token");
        Ok(Session {
            token,
            expires_at,
            profile,
        })
    }

    async fn authenticate(&self, token: &AccessToken) -> Result<Actor, Error> {
        let account_id = self
            .tokens
            .resolve(&token.digest(), self.clock.utc())
            .await
            .map_err(map_token_error)?
            .ok_or_else(|| Error::unauthorized("invalid or expired token"))?;

        let role = self
            .accounts
            .role_of(&account_id)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::forbidden("account has no role assigned"))?;

        Ok(Actor::new(account_id, role))
    }

    async fn logout(&self, token: &AccessToken) -> Result<(), Error> {
        self.tokens
            .revoke(&token.digest())
            .await
            .map_err(map_token_error)
    }

    async fn current_account(&self, actor: &Actor) -> Result<AccountProfile, Error> {
        self.accounts
            .find_profile(actor.account_id())
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::not_found("account not found"))
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;

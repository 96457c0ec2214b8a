//! Driving port for login and bearer-token authentication.
//!
//! Inbound adapters call this port to turn a presented bearer token into an
//! [`Actor`]. Implementations must read the role from storage on every call
//! so a caller can never assert their own role.

use async_trait::async_trait;

use crate::domain::{AccessToken, AccountProfile, Actor, Error, LoginCredentials, Session};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials and issue a bearer token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error>;

    /// Resolve a bearer token to the caller and their current role.
    async fn authenticate(&self, token: &AccessToken) -> Result<Actor, Error>;

    /// Revoke the presented token.
    async fn logout(&self, token: &AccessToken) -> Result<(), Error>;

    /// Profile of the authenticated caller.
    async fn current_account(&self, actor: &Actor) -> Result<AccountProfile, Error>;
}

//! Account roles and the authenticated caller.
//!
//! Every privileged operation takes an [`Actor`]. Actors are only minted by
//! the authentication service after resolving a bearer credential and
//! reading the role assignment from storage, so a role never originates from
//! client input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Error;
use super::account::AccountId;

/// Exclusive role held by an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Registers workers and manages doctor accounts.
    Admin,
    /// Scans workers and records visits.
    Doctor,
}

impl Role {
    /// Storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Doctor => "doctor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored or supplied role string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRoleError(pub String);

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "doctor" => Ok(Self::Doctor),
            other => Err(UnknownRoleError(other.to_owned())),
        }
    }
}

/// Authenticated caller with a role re-derived from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    account_id: AccountId,
    role: Role,
}

impl Actor {
    /// Bind an account to the role read from its role assignment.
    pub fn new(account_id: AccountId, role: Role) -> Self {
        Self { account_id, role }
    }

    /// Account the caller authenticated as.
    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Role held by the caller.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Require the caller to hold `role`.
    ///
    /// # Examples
    /// ```
    /// use medicare_backend::domain::{AccountId, Actor, ErrorCode, Role};
    ///
    /// let actor = Actor::new(AccountId::random(), Role::Doctor);
    /// assert!(actor.require(Role::Doctor).is_ok());
    /// let denied = actor.require(Role::Admin).expect_err("doctor is not admin");
    /// assert_eq!(denied.code(), ErrorCode::Forbidden);
    /// ```
    pub fn require(&self, role: Role) -> Result<(), Error> {
        if self.role == role {
            return Ok(());
        }
        let message = match role {
            Role::Admin => "admin role required",
            Role::Doctor => "doctor role required",
        };
        Err(Error::forbidden(message))
    }

    /// Require the caller to hold any of `roles`.
    pub fn require_any(&self, roles: &[Role]) -> Result<(), Error> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(Error::forbidden("role not permitted for this operation"))
        }
    }
}

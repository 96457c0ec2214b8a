//! Port for account identities, profiles and role assignments.

use async_trait::async_trait;

use crate::domain::{
    AccountId, AccountProfile, Email, FullName, LoginCredentials, Password, Role, SearchTerm,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// An identity with this email already exists.
        DuplicateEmail { email: String } =>
            "an account already exists for {email}",
    }
}

/// Port over the identity store.
///
/// Identity creation, profile insertion and role assignment are separate
/// calls. Callers needing all three compensate by deleting the identity
/// when a later step fails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create a login identity and return its id.
    async fn create_identity(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<AccountId, AccountRepositoryError>;

    /// Delete an identity together with anything hanging off it.
    async fn delete_identity(&self, id: &AccountId) -> Result<(), AccountRepositoryError>;

    /// Attach a display profile to an identity.
    async fn insert_profile(
        &self,
        id: &AccountId,
        full_name: &FullName,
    ) -> Result<(), AccountRepositoryError>;

    /// Assign the single role held by an identity.
    async fn assign_role(&self, id: &AccountId, role: Role) -> Result<(), AccountRepositoryError>;

    /// Check a password, returning the matching identity.
    async fn verify_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<AccountId>, AccountRepositoryError>;

    /// Load an identity with its profile and role. `None` without a profile.
    async fn find_profile(
        &self,
        id: &AccountId,
    ) -> Result<Option<AccountProfile>, AccountRepositoryError>;

    /// Role currently assigned to an identity.
    async fn role_of(&self, id: &AccountId) -> Result<Option<Role>, AccountRepositoryError>;

    /// Whether any identity holds `role`.
    async fn any_with_role(&self, role: Role) -> Result<bool, AccountRepositoryError>;

    /// Profiles holding `role`, newest first, optionally filtered by name.
    async fn list_with_role(
        &self,
        role: Role,
        search: Option<SearchTerm>,
    ) -> Result<Vec<AccountProfile>, AccountRepositoryError>;

    /// Number of identities holding `role`.
    async fn count_with_role(&self, role: Role) -> Result<u64, AccountRepositoryError>;

    /// Remove the profile and role assignment of an identity holding `role`.
    ///
    /// The identity row is kept so authored records still reference it.
    /// Returns `false` when the identity does not hold `role`.
    async fn revoke_role(&self, id: &AccountId, role: Role) -> Result<bool, AccountRepositoryError>;
}

//! Identity provisioning: demo seeding and admin-driven doctor creation.
//!
//! Creating an identity takes three independent writes (identity, profile,
//! role). There is no surrounding transaction, so a failure after the
//! identity exists is undone by deleting the identity again.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info, warn};

use super::ports::{AccountProvisioning, AccountRepository, AccountRepositoryError, AuthService};
use super::repository_errors::map_account_error;
use super::{
    AccessToken, AccountId, AccountProfile, DoctorAccountRequest, DoctorRequestError, Email,
    Error, FullName, NewDoctorAccount, Password, Role,
};

/// Fixed credentials seeded by [`AccountProvisioning::create_demo_accounts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub full_name: &'static str,
    pub role: Role,
}

/// Accounts created by the demo seeding operation.
pub const DEMO_ACCOUNTS: [DemoAccount; 2] = [
    DemoAccount {
        email: "admin@medicare.demo",
        password: "admin123",
        full_name: "System Admin",
        role: Role::Admin,
    },
    DemoAccount {
        email: "doctor1@medicare.demo",
        password: "doctor123",
        full_name: "Dr. Demo Doctor",
        role: Role::Doctor,
    },
];

fn already_provisioned() -> Error {
    Error::invalid_request("Admin account already exists. Use the existing credentials to login.")
        .with_reason("already_provisioned")
}

/// Which step of a multi-write provisioning failed.
#[derive(Debug)]
enum ProvisionFailure {
    Identity(AccountRepositoryError),
    Profile(AccountRepositoryError),
    Role(AccountRepositoryError),
}

/// Provisioning service over the account repository.
#[derive(Clone)]
pub struct ProvisioningService<A, S> {
    accounts: Arc<A>,
    auth: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<A, S> ProvisioningService<A, S> {
    /// Create a provisioning service. `auth` re-validates doctor-creation callers.
    pub fn new(accounts: Arc<A>, auth: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            auth,
            clock,
        }
    }
}

impl<A, S> ProvisioningService<A, S>
where
    A: AccountRepository,
{
    async fn provision(
        &self,
        email: &Email,
        password: &Password,
        full_name: &FullName,
        role: Role,
    ) -> Result<AccountId, ProvisionFailure> {
        let id = self
            .accounts
            .create_identity(email, password)
            .await
            .map_err(ProvisionFailure::Identity)?;

        if let Err(err) = self.accounts.insert_profile(&id, full_name).await {
            self.compensate(&id).await;
            return Err(ProvisionFailure::Profile(err));
        }
        if let Err(err) = self.accounts.assign_role(&id, role).await {
            self.compensate(&id).await;
            return Err(ProvisionFailure::Role(err));
        }
        Ok(id)
    }

    async fn compensate(&self, id: &AccountId) {
        warn!(account_id = %id, "rolling back partially provisioned account");
        if let Err(err) = self.accounts.delete_identity(id).await {
            error!(account_id = %id, error = %err, "failed to roll back provisioned account");
        }
    }

    async fn seed_demo_account(&self, demo: &DemoAccount) -> Result<(), Error> {
        let email = Email::new(demo.email).map_err(|err| Error::internal(err.to_string()))?;
        let password =
            Password::new(demo.password).map_err(|err| Error::internal(err.to_string()))?;
        let full_name =
            FullName::new(demo.full_name).map_err(|err| Error::internal(err.to_string()))?;

        match self.provision(&email, &password, &full_name, demo.role).await {
            Ok(_) => Ok(()),
            Err(ProvisionFailure::Identity(AccountRepositoryError::DuplicateEmail { .. })) => {
                Err(already_provisioned())
            }
            Err(
                ProvisionFailure::Identity(err)
                | ProvisionFailure::Profile(err)
                | ProvisionFailure::Role(err),
            ) => Err(Error::internal(format!("demo provisioning failed: {err}"))),
        }
    }
}

#[async_trait]
impl<A, S> AccountProvisioning for ProvisioningService<A, S>
where
    A: AccountRepository,
    S: AuthService,
{
    async fn create_demo_accounts(&self) -> Result<Vec<DemoAccount>, Error> {
        let admin_exists = self
            .accounts
            .any_with_role(Role::Admin)
            .await
            .map_err(|err| Error::internal(format!("demo provisioning failed: {err}")))?;
        if admin_exists {
            return Err(already_provisioned());
        }

        for demo in &DEMO_ACCOUNTS {
            self.seed_demo_account(demo).await?;
        }
        info!("demo accounts provisioned");
        Ok(DEMO_ACCOUNTS.to_vec())
    }

    async fn create_doctor(
        &self,
        credential: Option<AccessToken>,
        request: DoctorAccountRequest,
    ) -> Result<AccountProfile, Error> {
        let token = credential.ok_or_else(|| Error::unauthorized("Unauthorized"))?;
        let actor = self.auth.authenticate(&token).await?;
        actor
            .require(Role::Admin)
            .map_err(|_| Error::forbidden("Only admins can create doctor accounts"))?;

        let account = NewDoctorAccount::try_from(request).map_err(|err| match err {
            DoctorRequestError::MissingFields => {
                Error::invalid_request(err.to_string()).with_reason("missing_fields")
            }
            DoctorRequestError::Invalid(_) => {
                Error::invalid_request(err.to_string()).with_reason("invalid_field")
            }
        })?;

        let id = self
            .provision(
                &account.email,
                &account.password,
                &account.full_name,
                Role::Doctor,
            )
            .await
            .map_err(|failure| match failure {
                ProvisionFailure::Identity(err @ AccountRepositoryError::DuplicateEmail { .. }) => {
                    map_account_error(err)
                }
                ProvisionFailure::Identity(err) => {
                    Error::invalid_request(format!("failed to create account: {err}"))
                        .with_reason("account_creation_failed")
                }
                ProvisionFailure::Profile(err) => {
                    Error::invalid_request(format!("failed to create profile: {err}"))
                        .with_reason("account_creation_failed")
                }
                ProvisionFailure::Role(err) => {
                    Error::invalid_request(format!("failed to assign role: {err}"))
                        .with_reason("account_creation_failed")
                }
            })?;

        info!(account_id = %id, created_by = %actor.account_id(), "doctor account created");
        Ok(AccountProfile {
            id,
            email: account.email,
            full_name: account.full_name,
            role: Some(Role::Doctor),
            created_at: self.clock.utc(),
        })
    }
}

#[cfg(test)]
#[path = "provisioning_service_tests.rs"]
mod tests;

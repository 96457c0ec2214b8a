//! Driving port for identity-creating operations.

use async_trait::async_trait;

use crate::domain::{AccessToken, AccountProfile, DemoAccount, DoctorAccountRequest, Error};

/// Domain use-case port for provisioning accounts.
#[async_trait]
pub trait AccountProvisioning: Send + Sync {
    /// Seed one admin and one doctor with fixed demo credentials.
    ///
    /// Fails with an `already_provisioned` invalid-request error once any
    /// admin exists.
    async fn create_demo_accounts(&self) -> Result<Vec<DemoAccount>, Error>;

    /// Create a doctor identity on behalf of an admin.
    ///
    /// The credential is taken raw and re-validated here rather than trusting
    /// an upstream check.
    async fn create_doctor(
        &self,
        credential: Option<AccessToken>,
        request: DoctorAccountRequest,
    ) -> Result<AccountProfile, Error>;
}

//! Driving port for the admin-facing doctor directory.

use async_trait::async_trait;

use crate::domain::{AccountId, AccountProfile, Actor, Error, SearchTerm};

/// Domain use-case port for listing and removing doctors.
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    /// Doctors newest first, optionally filtered by name.
    async fn list_doctors(
        &self,
        actor: &Actor,
        search: Option<SearchTerm>,
    ) -> Result<Vec<AccountProfile>, Error>;

    /// Remove a doctor's profile, role and tokens.
    async fn remove_doctor(&self, actor: &Actor, doctor: &AccountId) -> Result<(), Error>;
}

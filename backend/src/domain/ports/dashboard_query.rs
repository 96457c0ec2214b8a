//! Driving port for dashboard statistics.

use async_trait::async_trait;

use crate::domain::{Actor, AdminOverview, DoctorOverview, Error};

/// Domain use-case port for role dashboards.
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// System-wide counts and the latest visits. Admin only.
    async fn admin_overview(&self, actor: &Actor) -> Result<AdminOverview, Error>;

    /// The calling doctor's counts and latest visits. Doctor only.
    async fn doctor_overview(&self, actor: &Actor) -> Result<DoctorOverview, Error>;
}

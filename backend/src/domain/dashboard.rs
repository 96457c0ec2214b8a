//! Dashboard read models.
//!
//! Counts are optional: each is fetched independently and a failed read
//! surfaces as `None` instead of failing the whole overview.

use super::visit::VisitWithWorker;

/// Number of recent visits shown on either dashboard.
pub const RECENT_VISIT_LIMIT: u32 = 5;

/// System-wide statistics for administrators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminOverview {
    pub workers: Option<u64>,
    pub doctors: Option<u64>,
    pub visits: Option<u64>,
    pub recent_visits: Vec<VisitWithWorker>,
}

/// Statistics scoped to the calling doctor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorOverview {
    pub my_visits: Option<u64>,
    /// Own visits dated today or later.
    pub today_visits: Option<u64>,
    pub total_workers: Option<u64>,
    pub recent_visits: Vec<VisitWithWorker>,
}

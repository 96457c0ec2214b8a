//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, and the services implementing the driving ports.
//! Keep types immutable and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable error identifier.
//! - Role / Actor: the authenticated caller and its single role.
//! - Worker / WorkerIdentifier: registered workers and their QR payload.
//! - Visit / VisitDraft: append-only medical visit records.
//! - Services: `TokenAuthService`, `ProvisioningService`,
//!   `DoctorDirectoryService`, `WorkerRegistryService`,
//!   `VisitRecordsService`, `DashboardService`.

pub mod account;
pub mod auth;
pub mod auth_service;
pub mod dashboard;
pub mod dashboard_service;
pub mod doctor_directory_service;
pub mod error;
pub mod ports;
pub mod provisioning_service;
mod repository_errors;
pub mod role;
pub mod search;
pub mod trace_id;
pub mod visit;
pub mod visit_records_service;
pub mod worker;
pub mod worker_registry_service;

pub use self::account::{
    AccountId, AccountProfile, AccountValidationError, DoctorAccountRequest, DoctorRequestError,
    Email, FullName, NewDoctorAccount, Password,
};
pub use self::auth::{
    AccessToken, AccessTokenFormatError, LoginCredentials, LoginValidationError, Session,
    TokenDigest,
};
pub use self::auth_service::{DEFAULT_TOKEN_TTL, TokenAuthService};
pub use self::dashboard::{AdminOverview, DoctorOverview, RECENT_VISIT_LIMIT};
pub use self::dashboard_service::DashboardService;
pub use self::doctor_directory_service::DoctorDirectoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::provisioning_service::{DEMO_ACCOUNTS, DemoAccount, ProvisioningService};
pub use self::role::{Actor, Role, UnknownRoleError};
pub use self::search::SearchTerm;
pub use self::trace_id::TraceId;
pub use self::visit::{
    AuthoredVisit, NewVisit, UNKNOWN_AUTHOR, Visit, VisitDraft, VisitScope, VisitSubmission,
    VisitValidationError, VisitWithWorker, WorkerBrief, WorkerHistory,
};
pub use self::visit_records_service::VisitRecordsService;
pub use self::worker::{
    Age, Gender, NewWorker, Worker, WorkerIdentifier, WorkerRegistration, WorkerSummary,
    WorkerValidationError,
};
pub use self::worker_registry_service::WorkerRegistryService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use medicare_backend::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::forbidden("admin role required"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;

//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (repositories, token store) describe how the domain talks to
//! storage. Driving ports (auth, provisioning, registry, records, dashboard)
//! are the use-cases inbound adapters call. Driven ports expose strongly
//! typed errors so adapters map failures into predictable variants; driving
//! ports return the domain [`Error`](crate::domain::Error).

mod macros;

mod account_provisioning;
mod account_repository;
mod auth_service;
mod dashboard_query;
mod doctor_directory;
mod token_store;
mod visit_records;
mod visit_repository;
mod worker_registry;
mod worker_repository;

pub(crate) use macros::define_port_error;

pub use account_provisioning::AccountProvisioning;
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use auth_service::MockAuthService;
pub use auth_service::AuthService;
pub use dashboard_query::DashboardQuery;
pub use doctor_directory::DoctorDirectory;
#[cfg(test)]
pub use token_store::MockTokenStore;
pub use token_store::{TokenStore, TokenStoreError};
pub use visit_records::VisitRecords;
#[cfg(test)]
pub use visit_repository::MockVisitRepository;
pub use visit_repository::{VisitRepository, VisitRepositoryError};
pub use worker_registry::WorkerRegistry;
#[cfg(test)]
pub use worker_repository::MockWorkerRepository;
pub use worker_repository::{WorkerRepository, WorkerRepositoryError};

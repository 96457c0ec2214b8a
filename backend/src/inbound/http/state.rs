//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! the same handlers run against PostgreSQL, the in-memory store or mocks.

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::Clock;

use crate::domain::ports::{
    AccountProvisioning, AccountRepository, AuthService, DashboardQuery, DoctorDirectory,
    TokenStore, VisitRecords, VisitRepository, WorkerRegistry, WorkerRepository,
};
use crate::domain::{
    DashboardService, DoctorDirectoryService, ProvisioningService, TokenAuthService,
    VisitRecordsService, WorkerRegistryService,
};
use crate::scanning::DEFAULT_QR_SIZE;

/// Parameter object bundling the port implementations.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub auth: Arc<dyn AuthService>,
    pub provisioning: Arc<dyn AccountProvisioning>,
    pub doctors: Arc<dyn DoctorDirectory>,
    pub workers: Arc<dyn WorkerRegistry>,
    pub visits: Arc<dyn VisitRecords>,
    pub dashboard: Arc<dyn DashboardQuery>,
}

impl HttpStatePorts {
    /// Wire every domain service over one set of repositories.
    pub fn from_repositories<A, T, W, V>(
        accounts: Arc<A>,
        tokens: Arc<T>,
        workers: Arc<W>,
        visits: Arc<V>,
        clock: Arc<dyn Clock>,
        token_ttl: TimeDelta,
    ) -> Self
    where
        A: AccountRepository + 'static,
        T: TokenStore + 'static,
        W: WorkerRepository + 'static,
        V: VisitRepository + 'static,
    {
        let auth = Arc::new(TokenAuthService::new(
            Arc::clone(&accounts),
            Arc::clone(&tokens),
            Arc::clone(&clock),
            token_ttl,
        ));
        Self {
            provisioning: Arc::new(ProvisioningService::new(
                Arc::clone(&accounts),
                Arc::clone(&auth),
                Arc::clone(&clock),
            )),
            doctors: Arc::new(DoctorDirectoryService::new(Arc::clone(&accounts), tokens)),
            workers: Arc::new(WorkerRegistryService::new(Arc::clone(&workers))),
            visits: Arc::new(VisitRecordsService::new(
                Arc::clone(&workers),
                Arc::clone(&visits),
                Arc::clone(&clock),
            )),
            dashboard: Arc::new(DashboardService::new(accounts, workers, visits, clock)),
            auth,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthService>,
    pub provisioning: Arc<dyn AccountProvisioning>,
    pub doctors: Arc<dyn DoctorDirectory>,
    pub workers: Arc<dyn WorkerRegistry>,
    pub visits: Arc<dyn VisitRecords>,
    pub dashboard: Arc<dyn DashboardQuery>,
    /// Default edge length, in pixels, of exported QR codes.
    pub qr_size: u32,
}

impl HttpState {
    /// Build state with the default QR size.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            auth,
            provisioning,
            doctors,
            workers,
            visits,
            dashboard,
        } = ports;
        Self {
            auth,
            provisioning,
            doctors,
            workers,
            visits,
            dashboard,
            qr_size: DEFAULT_QR_SIZE,
        }
    }

    #[must_use]
    pub fn with_qr_size(mut self, qr_size: u32) -> Self {
        self.qr_size = qr_size;
        self
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

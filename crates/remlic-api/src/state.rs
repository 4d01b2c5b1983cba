//! Application state shared across all handlers.

use std::sync::Arc;

use remlic_core::config::AppConfig;
use remlic_core::result::AppResult;
use remlic_database::store::{LicenseStore, ProfileStore};
use remlic_service::{
    ContactService, DashboardService, LicenseService, LimitService, PsiraClient,
};

use crate::auth::TokenVerifier;

/// Shared application state available to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// License storage, used directly by the health check.
    pub licenses: Arc<dyn LicenseStore>,
    /// Access token verifier.
    pub verifier: Arc<TokenVerifier>,
    /// Record orchestration.
    pub license_service: Arc<LicenseService>,
    /// Dashboard loading.
    pub dashboard_service: Arc<DashboardService>,
    /// Tier limits.
    pub limit_service: Arc<LimitService>,
    /// Contact form.
    pub contact_service: Arc<ContactService>,
    /// PSIRA registry client.
    pub psira_client: Arc<PsiraClient>,
}

impl AppState {
    /// Wire every service over the given stores.
    pub fn new(
        config: Arc<AppConfig>,
        licenses: Arc<dyn LicenseStore>,
        profiles: Arc<dyn ProfileStore>,
    ) -> AppResult<Self> {
        let dashboard_service = Arc::new(DashboardService::new(
            Arc::clone(&licenses),
            Arc::clone(&profiles),
        ));
        let limit_service = Arc::new(LimitService::new(
            Arc::clone(&licenses),
            Arc::clone(&profiles),
        ));
        let license_service = Arc::new(LicenseService::new(
            Arc::clone(&licenses),
            Arc::clone(&limit_service),
            Arc::clone(&dashboard_service),
        ));
        let psira_client = Arc::new(PsiraClient::new(&config.psira)?);
        let verifier = Arc::new(TokenVerifier::new(&config.backend));

        Ok(Self {
            config,
            licenses,
            verifier,
            license_service,
            dashboard_service,
            limit_service,
            contact_service: Arc::new(ContactService::new()),
            psira_client,
        })
    }
}

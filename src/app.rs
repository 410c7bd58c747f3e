use crate::admin::AdminService;
use crate::auth::AuthService;
use crate::backend::BackendClient;
use crate::config::Settings;
use crate::provider::ProviderClient;
use crate::search::SearchController;
use crate::session::SessionContext;
use crate::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared services every view and handler draws on
#[derive(Clone)]
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub backend: BackendClient,
    pub provider: Arc<ProviderClient>,
    pub session: SessionContext,
    pub auth: AuthService,
    pub admin: AdminService,
}

impl AppContext {
    /// Build services with the session stored at the configured path
    pub fn new(settings: Settings) -> Result<Self> {
        let session = SessionContext::open(settings.storage.path.clone());
        Self::with_session(settings, session)
    }

    pub fn with_session(settings: Settings, session: SessionContext) -> Result<Self> {
        let backend = BackendClient::new(&settings.backend)?;
        let provider = Arc::new(ProviderClient::new(&settings.provider)?);

        if provider.is_configured() {
            info!("Recipe provider configured at {}", settings.provider.base_url);
        } else {
            warn!("No recipe API key set, using local recipes from {}", backend.base_url());
        }

        Ok(Self {
            auth: AuthService::new(backend.clone(), session.clone()),
            admin: AdminService::new(backend.clone()),
            settings: Arc::new(settings),
            backend,
            provider,
            session,
        })
    }

    /// Fresh controller for a recipes view
    pub fn search_controller(&self) -> Arc<SearchController> {
        Arc::new(SearchController::new(
            Arc::clone(&self.provider),
            self.backend.clone(),
            &self.settings.search,
        ))
    }
}

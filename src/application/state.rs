// src/application/state.rs
//
// Process-wide client state: one session, one query cache and the services
// built on them. All fields are Arc-wrapped for sharing across tasks.

use std::sync::Arc;

use crate::application::session::Session;
use crate::cache::QueryCache;
use crate::config::StorefrontConfig;
use crate::integrations::CatalogBackend;
use crate::services::{
    BulkImportService, CatalogService, LeadService, ListingController, ListingFilter,
    ProfileService,
};

pub struct AppState {
    pub config: StorefrontConfig,
    pub session: Arc<Session>,
    pub cache: Arc<QueryCache>,
    pub catalog_service: Arc<CatalogService>,
    pub profile_service: Arc<ProfileService>,
    pub lead_service: Arc<LeadService>,
    pub bulk_import_service: Arc<BulkImportService>,
}

impl AppState {
    /// State with no connection yet; reads report NotReady until `connect`.
    pub fn new(config: StorefrontConfig) -> Self {
        let session = Arc::new(Session::new());
        let cache = Arc::new(QueryCache::from_config(Arc::clone(&session), &config));
        let catalog_service = Arc::new(CatalogService::from_config(Arc::clone(&cache), &config));

        Self {
            profile_service: Arc::new(ProfileService::new(Arc::clone(&cache))),
            lead_service: Arc::new(LeadService::new(Arc::clone(&cache), &config.whatsapp_number)),
            bulk_import_service: Arc::new(BulkImportService::new(
                Arc::clone(&catalog_service),
                config.image_limits,
            )),
            catalog_service,
            cache,
            session,
            config,
        }
    }

    pub fn connect(&self, backend: Arc<dyn CatalogBackend>, principal: Option<String>) {
        self.session.connect(backend, principal);
    }

    /// Tear down the session and drop every cached entry, so nothing leaks
    /// into the next identity's session.
    pub fn logout(&self) {
        self.session.disconnect();
        self.cache.clear();
    }

    /// A fresh listing owned by the caller's view
    pub fn listing(&self, filter: ListingFilter) -> ListingController {
        ListingController::from_config(Arc::clone(&self.session), filter, &self.config)
    }
}

// src/application/session.rs
//
// Client session context
//
// Holds the remote connection and the caller identity. Passed explicitly
// into the cache and listing controllers instead of living in a global.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{AppError, AppResult};
use crate::integrations::CatalogBackend;

#[derive(Default)]
pub struct Session {
    backend: RwLock<Option<Arc<dyn CatalogBackend>>>,
    principal: RwLock<Option<String>>,
}

impl Session {
    /// A session with no connection yet; reads resolve to NotReady
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected(backend: Arc<dyn CatalogBackend>) -> Self {
        let session = Self::new();
        session.connect(backend, None);
        session
    }

    pub fn connect(&self, backend: Arc<dyn CatalogBackend>, principal: Option<String>) {
        *self.backend.write().unwrap_or_else(PoisonError::into_inner) = Some(backend);
        *self.principal.write().unwrap_or_else(PoisonError::into_inner) = principal;
        log::info!("session connected");
    }

    pub fn disconnect(&self) {
        *self.backend.write().unwrap_or_else(PoisonError::into_inner) = None;
        *self.principal.write().unwrap_or_else(PoisonError::into_inner) = None;
        log::info!("session disconnected");
    }

    pub fn is_connected(&self) -> bool {
        self.backend
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The live connection, or `AppError::NotReady`
    pub fn backend(&self) -> AppResult<Arc<dyn CatalogBackend>> {
        self.backend
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(AppError::NotReady)
    }

    pub fn principal(&self) -> Option<String> {
        self.principal
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

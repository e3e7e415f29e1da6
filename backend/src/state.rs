//! Application state management
//!
//! This module provides the shared application state that is passed to all
//! request handlers via Axum's state extraction. The gateway handles are
//! trait objects so tests (and credential-less local runs) substitute the
//! in-memory implementations without touching the handlers.
//!
//! State is constructed once at startup and read-only afterwards; every
//! field is behind an `Arc`, so cloning per request is O(1).

use crate::config::AppConfig;
use crate::identity::IdentityProvider;
use crate::store::DocumentStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Document-store gateway
    pub store: Arc<dyn DocumentStore>,
    /// Identity-provider gateway
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            identity,
        }
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the document store
    #[inline]
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Get a reference to the identity provider
    #[inline]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }
}

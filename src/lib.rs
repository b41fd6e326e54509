//! EMS Client Library
//!
//! Typed client for the equipment management backend together with the
//! session, theme, routing and device-detection state a front end needs.

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod device;
pub mod guard;
pub mod logging;
pub mod role;
pub mod router;
pub mod storage;
pub mod theme;

use std::sync::{Mutex, PoisonError};

use tracing::info;

use api::{ApiClient, ApiError};
use auth::SessionStore;
use config::ClientConfig;
use device::Viewport;
use router::{ResolvedRoute, Router, RouterError};
use storage::{LocalStorage, StorageError};
use theme::{Document, ThemeStore};

/// Application state shared across commands
pub struct EmsContext {
    pub config: ClientConfig,
    pub api: ApiClient,
    pub storage: LocalStorage,
    pub session: tokio::sync::Mutex<SessionStore>,
    pub theme: Mutex<ThemeStore<Document>>,
    pub router: Mutex<Router>,
    pub viewport: Viewport,
}

impl EmsContext {
    /// Open storage, restore the session and theme, and build the router
    pub fn init(config: ClientConfig) -> Result<Self, ContextError> {
        let storage = LocalStorage::open(&config.data_dir)?;
        let api = ApiClient::from_config(&config)?;

        let session = SessionStore::new(api.clone(), storage.clone());
        let theme = ThemeStore::new(storage.clone(), Document::default());

        info!(
            "EMS context ready (api: {}, logged in: {})",
            api.base_url(),
            session.is_logged_in()
        );

        Ok(Self {
            config,
            api,
            storage,
            session: tokio::sync::Mutex::new(session),
            theme: Mutex::new(theme),
            router: Mutex::new(Router::new()),
            viewport: Viewport::default(),
        })
    }

    /// Navigate with the guard evaluated against the current session
    pub async fn navigate(&self, target: &str, forced: bool) -> Result<ResolvedRoute, RouterError> {
        let state = self.session.lock().await.state();
        self.router
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .navigate(target, &state, forced)
    }

    pub fn shutdown(self) {
        info!("EMS context shut down");
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

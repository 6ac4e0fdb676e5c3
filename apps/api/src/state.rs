use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::backend::{AuthProvider, DataStore, SupabaseClient};
use crate::config::Config;
use crate::errors::AppError;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Built once at startup and kept for the life of the process. Both backend
/// handles are `None` in degraded mode; per-user state (access token, theme)
/// travels with each request instead.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Option<Arc<dyn DataStore>>,
    pub auth: Option<Arc<dyn AuthProvider>>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self> {
        let Some(backend) = config.backend.as_ref() else {
            warn!("SUPABASE_URL / SUPABASE_ANON_KEY are not set. Running in read-only degraded mode.");
            return Ok(Self::degraded(config));
        };

        let client = Arc::new(
            SupabaseClient::new(backend).context("Failed to build backend HTTP client")?,
        );
        info!("Backend client initialized ({})", backend.url);

        Ok(AppState {
            config,
            store: Some(client.clone()),
            auth: Some(client),
        })
    }

    pub fn degraded(config: Config) -> Self {
        AppState {
            config,
            store: None,
            auth: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.store.is_none()
    }

    pub fn store(&self) -> Result<&dyn DataStore, AppError> {
        self.store.as_deref().ok_or(AppError::Degraded)
    }

    pub fn auth(&self) -> Result<&dyn AuthProvider, AppError> {
        self.auth.as_deref().ok_or(AppError::Degraded)
    }
}

//! Application state - the wired controller and the front-end adapters it
//! calls back into.

use std::sync::Arc;

use authflow_core::AuthFlowController;
use authflow_core::ports::KeyValueStore;
use authflow_infra::{FileStore, FirebaseIdentity, HttpAuthApi, InMemoryStore};

#[cfg(feature = "redis")]
use authflow_infra::{RedisConfig, RedisStore};

use crate::config::{AppConfig, StorageKind};
use crate::console::{TerminalPopup, TerminalRedirector};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<AuthFlowController>,
    pub popup: Arc<TerminalPopup>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let api = Arc::new(HttpAuthApi::new(config.api.clone())?);

        let popup = Arc::new(TerminalPopup::new());
        if config.firebase.api_key.is_empty() {
            tracing::warn!("FIREBASE_API_KEY not set. Identity provider sign-in will fail.");
        }
        let identity =
            Arc::new(FirebaseIdentity::new(config.firebase.clone())?.with_popup(popup.clone()));

        let store = Self::store(config).await;
        let redirector = Arc::new(TerminalRedirector);

        let controller = Arc::new(AuthFlowController::new(
            api,
            identity,
            store,
            redirector,
            config.controller.clone(),
        ));

        tracing::info!(
            base_url = %config.api.base_url,
            mode = ?config.controller.verification_mode,
            "Application state initialized"
        );

        Ok(Self { controller, popup })
    }

    async fn store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
        match config.storage {
            StorageKind::File => {
                tracing::debug!(path = %config.storage_path.display(), "Using file storage");
                Arc::new(FileStore::new(&config.storage_path))
            }
            StorageKind::Memory => {
                tracing::info!("Using in-memory storage; the session ends with the process");
                Arc::new(InMemoryStore::new())
            }
            StorageKind::Redis => Self::redis_store(config).await,
        }
    }

    #[cfg(feature = "redis")]
    async fn redis_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
        let redis_config = RedisConfig {
            url: config.redis_url.clone(),
            ..RedisConfig::from_env()
        };
        match RedisStore::new(redis_config).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!("Failed to connect to Redis: {}. Using in-memory fallback.", e);
                Arc::new(InMemoryStore::new())
            }
        }
    }

    #[cfg(not(feature = "redis"))]
    async fn redis_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
        tracing::warn!(
            url = %config.redis_url,
            "Built without the redis feature - using in-memory storage"
        );
        Arc::new(InMemoryStore::new())
    }
}

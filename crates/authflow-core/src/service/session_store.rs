//! Session persistence on top of a key-value store.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::Session;
use crate::ports::{KeyValueStore, StoreError};

/// Key holding the raw access token.
pub const TOKEN_KEY: &str = "jwt_token";
/// Older builds stored the token under this key.
pub const LEGACY_TOKEN_KEY: &str = "access_token";
/// Key holding the JSON-encoded user record.
pub const USER_KEY: &str = "user";

/// Reads and writes the single persisted session.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist `session`, replacing whatever was stored.
    pub async fn save(&self, session: &Session) -> Result<(), StoreError> {
        let user = serde_json::to_string(&session.user)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.store.remove(LEGACY_TOKEN_KEY).await?;
        self.store.set(TOKEN_KEY, &session.access_token).await?;
        self.store.set(USER_KEY, &user).await?;
        Ok(())
    }

    /// Load the stored session. Both the token and the user record must be
    /// present; an unreadable user record counts as no session.
    pub async fn load(&self) -> Result<Option<Session>, StoreError> {
        let token = match self.store.get(TOKEN_KEY).await? {
            Some(token) => Some(token),
            None => self.store.get(LEGACY_TOKEN_KEY).await?,
        };
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        let Some(user) = self.store.get(USER_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Value>(&user) {
            Ok(user) => Ok(Some(Session::new(token, user))),
            Err(e) => {
                tracing::warn!(error = %e, "Stored user record is not valid JSON");
                Ok(None)
            }
        }
    }

    /// Remove the session keys, leaving other entries alone.
    pub async fn remove(&self) -> Result<(), StoreError> {
        for key in [TOKEN_KEY, LEGACY_TOKEN_KEY, USER_KEY] {
            self.store.remove(key).await?;
        }
        Ok(())
    }

    /// Remove everything in the underlying store.
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        self.store.clear().await
    }
}

//! Session and auth gate
//!
//! A [`Session`] is the explicit handle every view receives. It owns the tab's
//! volatile storage and is the only writer of the bearer token.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::api::CatalogApi;
use super::error::ClientError;

/// Storage key of the bearer token.
pub const TOKEN_STORAGE_KEY: &str = "booklist_token";

/// Volatile key/value storage scoped to one tab. Dropped with it.
#[derive(Clone, Default)]
pub struct TabStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl TabStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    pub fn set(&self, key: &str, value: String) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value);
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key)
    }
}

#[derive(Clone)]
pub struct Session {
    api: Arc<dyn CatalogApi>,
    storage: TabStorage,
}

impl Session {
    pub fn new(api: Arc<dyn CatalogApi>, storage: TabStorage) -> Self {
        Self { api, storage }
    }

    pub fn api(&self) -> &Arc<dyn CatalogApi> {
        &self.api
    }

    pub fn storage(&self) -> &TabStorage {
        &self.storage
    }

    /// Token restored from tab storage, if this tab has verified before.
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_STORAGE_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Exchange a passcode for a token and keep it for the rest of the tab.
    ///
    /// Nothing is stored on failure, and a failed attempt can be retried
    /// immediately.
    pub async fn verify(&self, passcode: &str) -> Result<String, ClientError> {
        match self.api.verify_passcode(passcode).await {
            Ok(token) => {
                self.storage.set(TOKEN_STORAGE_KEY, token.clone());
                tracing::info!("Passcode accepted, session unlocked");
                Ok(token)
            }
            Err(e) => {
                tracing::warn!("Passcode verification failed: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeBackend;

    #[tokio::test]
    async fn test_verify_stores_token() {
        let backend = FakeBackend::with_passcode("letmein", "tok-1");
        let session = Session::new(Arc::new(backend), TabStorage::new());

        assert!(!session.is_authenticated());
        let token = session.verify("letmein").await.unwrap();
        assert_eq!(token, "tok-1");
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert_eq!(
            session.storage().get(TOKEN_STORAGE_KEY).as_deref(),
            Some("tok-1")
        );
    }

    #[tokio::test]
    async fn test_rejected_passcode_stores_nothing_and_allows_retry() {
        let backend = FakeBackend::with_passcode("letmein", "tok-1");
        let session = Session::new(Arc::new(backend), TabStorage::new());

        for _ in 0..3 {
            assert!(matches!(
                session.verify("nope").await,
                Err(ClientError::InvalidCredential)
            ));
            assert!(session.token().is_none());
        }

        assert!(session.verify("letmein").await.is_ok());
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_sessions_sharing_storage_see_the_same_token() {
        let storage = TabStorage::new();
        let backend: Arc<dyn CatalogApi> = Arc::new(FakeBackend::default());
        let catalog_session = Session::new(backend.clone(), storage.clone());
        let add_session = Session::new(backend, storage.clone());

        storage.set(TOKEN_STORAGE_KEY, "tok-9".to_string());
        assert_eq!(catalog_session.token().as_deref(), Some("tok-9"));
        assert_eq!(add_session.token().as_deref(), Some("tok-9"));

        storage.remove(TOKEN_STORAGE_KEY);
        assert!(!catalog_session.is_authenticated());
    }
}

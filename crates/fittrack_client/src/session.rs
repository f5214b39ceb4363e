//! Shared bearer-token holder and persisted token storage.
//!
//! A [`Session`] is cloned into the HTTP client and the session store; both
//! observe the same token. A [`TokenStore`] keeps the token across process
//! restarts under the [`TOKEN_STORAGE_KEY`] key.

use crate::FitTrackError;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

pub const TOKEN_STORAGE_KEY: &str = "token";

#[derive(Clone, Debug, Default)]
pub struct Session {
    token: Arc<RwLock<Option<SecretString>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (`Some`) or remove (`None`) the bearer used by every later request.
    pub async fn set_token(&self, token: Option<SecretString>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<SecretString> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// The `Authorization` header value, when a token is installed.
    pub async fn bearer_header(&self) -> Option<String> {
        self.token
            .read()
            .await
            .as_ref()
            .map(|t| format!("Bearer {}", t.expose_secret()))
    }
}

#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    async fn load(&self) -> Result<Option<SecretString>, FitTrackError>;
    async fn save(&self, token: &SecretString) -> Result<(), FitTrackError>;
    async fn clear(&self) -> Result<(), FitTrackError>;
}

/// Token persisted in a small JSON map file: `{"token": "..."}`.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<HashMap<String, String>, FitTrackError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                FitTrackError::Storage(format!("corrupt token file {}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(FitTrackError::Storage(e.to_string())),
        }
    }

    async fn write_map(&self, map: &HashMap<String, String>) -> Result<(), FitTrackError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FitTrackError::Storage(e.to_string()))?;
        }
        let raw = serde_json::to_string(map).map_err(|e| FitTrackError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| FitTrackError::Storage(e.to_string()))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<SecretString>, FitTrackError> {
        let map = self.read_map().await?;
        Ok(map
            .get(TOKEN_STORAGE_KEY)
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::new(t.clone().into())))
    }

    async fn save(&self, token: &SecretString) -> Result<(), FitTrackError> {
        let mut map = self.read_map().await.unwrap_or_default();
        map.insert(
            TOKEN_STORAGE_KEY.to_string(),
            token.expose_secret().to_string(),
        );
        self.write_map(&map).await
    }

    async fn clear(&self) -> Result<(), FitTrackError> {
        let mut map = match self.read_map().await {
            Ok(map) => map,
            // nothing readable to keep; drop the whole file
            Err(_) => {
                return match tokio::fs::remove_file(&self.path).await {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(FitTrackError::Storage(e.to_string())),
                };
            }
        };
        if map.remove(TOKEN_STORAGE_KEY).is_none() {
            return Ok(());
        }
        self.write_map(&map).await
    }
}

/// Process-local token store, used by tests and `--ephemeral` sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(TOKEN_STORAGE_KEY.to_string(), token.to_string());
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Raw stored value, for assertions.
    pub async fn raw(&self) -> Option<String> {
        self.entries.lock().await.get(TOKEN_STORAGE_KEY).cloned()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<SecretString>, FitTrackError> {
        Ok(self
            .entries
            .lock()
            .await
            .get(TOKEN_STORAGE_KEY)
            .map(|t| SecretString::new(t.clone().into())))
    }

    async fn save(&self, token: &SecretString) -> Result<(), FitTrackError> {
        self.entries.lock().await.insert(
            TOKEN_STORAGE_KEY.to_string(),
            token.expose_secret().to_string(),
        );
        Ok(())
    }

    async fn clear(&self) -> Result<(), FitTrackError> {
        self.entries.lock().await.remove(TOKEN_STORAGE_KEY);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_bearer_follows_token() {
        let session = Session::new();
        assert!(session.bearer_header().await.is_none());

        session.set_token(Some(SecretString::new("T".into()))).await;
        assert_eq!(session.bearer_header().await.as_deref(), Some("Bearer T"));

        // clones observe the same token
        let other = session.clone();
        other.set_token(None).await;
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn file_store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));

        assert!(store.load().await.unwrap().is_none());
        store.save(&SecretString::new("tok123".into())).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["token"], "tok123");

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.expose_secret(), "tok123");

        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_store_clear_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"token":"a","theme":"dark"}"#).unwrap();
        let store = FileTokenStore::new(&path);

        store.clear().await.unwrap();
        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(v.get("token").is_none());
        assert_eq!(v["theme"], "dark");
    }

    #[tokio::test]
    async fn file_store_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileTokenStore::new(&path);

        assert!(matches!(
            store.load().await,
            Err(FitTrackError::Storage(_))
        ));
        // clearing a corrupt file removes it
        store.clear().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn memory_store_clear_is_idempotent() {
        let store = MemoryTokenStore::with_token("abc");
        assert_eq!(store.raw().await.as_deref(), Some("abc"));
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}

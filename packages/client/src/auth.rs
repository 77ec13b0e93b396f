//! Token pair storage and the shared authentication context

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};

use crate::error::{ClientError, ClientResult};

/// Access and refresh token issued by `/auth/login` or `/auth/refresh`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            saved_at: Some(Utc::now()),
        }
    }
}

/// Durable home of the token pair
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet
    async fn load(&self) -> ClientResult<Option<TokenPair>>;

    async fn save(&self, tokens: &TokenPair) -> ClientResult<()>;

    async fn clear(&self) -> ClientResult<()>;
}

/// Token pair persisted as TOML on disk
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config_dir>/itms/auth.toml`
    pub fn default_location() -> Self {
        Self::new(itms_core::token_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> ClientResult<Option<TokenPair>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ClientError::storage(format!("Failed to read token file: {}", e)))?;
        let tokens: TokenPair = toml::from_str(&content)
            .map_err(|e| ClientError::storage(format!("Invalid token file: {}", e)))?;

        Ok(Some(tokens))
    }

    async fn save(&self, tokens: &TokenPair) -> ClientResult<()> {
        // Ensure config directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                ClientError::storage(format!("Failed to create token directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(tokens)
            .map_err(|e| ClientError::storage(format!("Failed to serialize tokens: {}", e)))?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| ClientError::storage(format!("Failed to write token file: {}", e)))?;

        tracing::debug!("Saved tokens to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .await
                .map_err(|e| ClientError::storage(format!("Failed to remove token file: {}", e)))?;
        }
        Ok(())
    }
}

/// Process-local store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> ClientResult<Option<TokenPair>> {
        Ok(self.tokens.lock().await.clone())
    }

    async fn save(&self, tokens: &TokenPair) -> ClientResult<()> {
        *self.tokens.lock().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        *self.tokens.lock().await = None;
        Ok(())
    }
}

/// The token pair shared by every request of one session.
///
/// Cloning is cheap; clones see the same tokens. Every change is written
/// through to the backing [`TokenStore`].
#[derive(Clone)]
pub struct AuthContext {
    tokens: Arc<RwLock<Option<TokenPair>>>,
    store: Arc<dyn TokenStore>,
}

impl AuthContext {
    /// Create a context backed by `store`, starting signed out
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(None)),
            store,
        }
    }

    /// Create a context and restore whatever `store` holds.
    ///
    /// An unreadable store is logged and treated as signed out.
    pub async fn restore(store: Arc<dyn TokenStore>) -> Self {
        let context = Self::new(store);
        match context.store.load().await {
            Ok(Some(tokens)) => {
                *context.tokens.write().await = Some(tokens);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Could not load stored tokens: {}", e),
        }
        context
    }

    /// Signed-out context that never touches the disk
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    pub async fn access_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .and_then(|t| t.refresh_token.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    /// Replace the token pair and persist it
    pub async fn set_tokens(&self, tokens: TokenPair) -> ClientResult<()> {
        self.store.save(&tokens).await?;
        *self.tokens.write().await = Some(tokens);
        Ok(())
    }

    /// Install a refreshed access token, keeping the refresh token unless rotated
    pub async fn update_access_token(
        &self,
        access_token: String,
        rotated_refresh_token: Option<String>,
    ) -> ClientResult<()> {
        let refresh_token = match rotated_refresh_token {
            Some(token) => Some(token),
            None => self.refresh_token().await,
        };
        self.set_tokens(TokenPair::new(access_token, refresh_token))
            .await
    }

    /// Forget the token pair in memory and in the store
    pub async fn clear(&self) -> ClientResult<()> {
        *self.tokens.write().await = None;
        self.store.clear().await
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("auth.toml"));

        assert!(store.load().await.unwrap().is_none());

        let tokens = TokenPair::new("access", Some("refresh".to_string()));
        store.save(&tokens).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(tokens));

        store.clear().await.unwrap();
        assert!(!store.path().exists());
        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_token_file_restores_signed_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("auth.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(matches!(store.load().await, Err(ClientError::Storage(_))));

        let context = AuthContext::restore(Arc::new(store)).await;
        assert!(!context.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_refresh_keeps_refresh_token_unless_rotated() {
        let store = Arc::new(MemoryTokenStore::new());
        let context = AuthContext::new(store.clone());
        context
            .set_tokens(TokenPair::new("a1", Some("r1".to_string())))
            .await
            .unwrap();

        context.update_access_token("a2".to_string(), None).await.unwrap();
        assert_eq!(context.access_token().await.as_deref(), Some("a2"));
        assert_eq!(context.refresh_token().await.as_deref(), Some("r1"));

        context
            .update_access_token("a3".to_string(), Some("r2".to_string()))
            .await
            .unwrap();
        let stored = store.load().await.unwrap().unwrap();
        assert_eq!(stored.access_token, "a3");
        assert_eq!(stored.refresh_token.as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn test_clones_share_tokens() {
        let context = AuthContext::in_memory();
        let clone = context.clone();
        context.set_tokens(TokenPair::new("a", None)).await.unwrap();
        assert!(clone.is_authenticated().await);

        clone.clear().await.unwrap();
        assert!(context.access_token().await.is_none());
    }
}

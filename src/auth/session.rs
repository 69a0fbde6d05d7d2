use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, warn};

use super::claims::{decode_claims, UserClaims};
use crate::error::{ClientError, ClientResult};

/// Persistent storage for the access token (device keychain, file, ...).
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<Option<String>>;
    async fn save(&self, token: &str) -> anyhow::Result<()>;
    async fn clear(&self) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> anyhow::Result<Option<String>> {
        Ok(self.token.lock().await.clone())
    }

    async fn save(&self, token: &str) -> anyhow::Result<()> {
        *self.token.lock().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        *self.token.lock().await = None;
        Ok(())
    }
}

/// Keeps the token in a plain file, e.g. for the command-line client.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> anyhow::Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    async fn save(&self, token: &str) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        tokio::fs::write(&self.path, token)
            .await
            .with_context(|| format!("writing {}", self.path.display()))
    }

    async fn clear(&self) -> anyhow::Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                Err(e).with_context(|| format!("removing {}", self.path.display()))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user: Option<UserClaims>,
}

/// The signed-in user's credentials, shared by every request.
pub struct Session {
    store: Arc<dyn TokenStore>,
    state: RwLock<AuthState>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            state: RwLock::new(AuthState::default()),
        }
    }

    /// Restores the session from the store. As with `set_token`, a token whose
    /// payload cannot be decoded is kept without a user; the server decides
    /// whether it is still good.
    pub async fn load(store: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let session = Self::new(store);
        if let Some(token) = session.store.load().await.map_err(storage)? {
            let user = readable_claims(&token);
            debug!(user_id = ?user.as_ref().map(|u| u.id.as_str()), "session restored");
            *session.state.write().await = AuthState {
                access_token: Some(token),
                user,
            };
        }
        Ok(session)
    }

    pub async fn snapshot(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    pub async fn user(&self) -> Option<UserClaims> {
        self.state.read().await.user.clone()
    }

    pub async fn user_id(&self) -> ClientResult<String> {
        self.user()
            .await
            .map(|u| u.id)
            .ok_or(ClientError::NotAuthenticated)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.access_token.is_some()
    }

    /// Persists a new access token and updates the decoded user. The token is
    /// kept even when its payload cannot be decoded.
    pub async fn set_token(&self, token: &str) -> ClientResult<()> {
        self.store.save(token).await.map_err(storage)?;
        let user = readable_claims(token);
        *self.state.write().await = AuthState {
            access_token: Some(token.to_string()),
            user,
        };
        Ok(())
    }

    /// Forgets the credentials (logout, failed refresh).
    pub async fn clear(&self) {
        *self.state.write().await = AuthState::default();
        if let Err(e) = self.store.clear().await {
            error!(error = %e, "failed to clear stored token");
        }
    }
}

fn readable_claims(token: &str) -> Option<UserClaims> {
    match decode_claims(token) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(error = %e, "access token payload unreadable");
            None
        }
    }
}

fn storage(e: anyhow::Error) -> ClientError {
    ClientError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::sign_for_tests;

    fn token_for(id: &str) -> String {
        sign_for_tests(&UserClaims {
            id: id.into(),
            email: None,
            username: None,
            role: None,
            iat: None,
            exp: None,
        })
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("nested").join("token"));
        assert_eq!(store.load().await.expect("load"), None);
        store.save("abc.def.ghi").await.expect("save");
        assert_eq!(store.load().await.expect("load"), Some("abc.def.ghi".into()));
        store.clear().await.expect("clear");
        store.clear().await.expect("clear twice");
        assert_eq!(store.load().await.expect("load"), None);
    }

    #[tokio::test]
    async fn load_restores_valid_token() {
        let token = token_for("user-1");
        let store = Arc::new(MemoryTokenStore::with_token(token.clone()));
        let session = Session::load(store).await.expect("load");
        assert_eq!(session.access_token().await, Some(token));
        assert_eq!(session.user_id().await.expect("user id"), "user-1");
    }

    #[tokio::test]
    async fn opaque_token_survives_a_restart() {
        let store = Arc::new(MemoryTokenStore::default());
        Session::new(store.clone())
            .set_token("opaque")
            .await
            .expect("set");

        let restored = Session::load(store.clone()).await.expect("load");
        assert_eq!(restored.access_token().await.as_deref(), Some("opaque"));
        assert!(restored.user().await.is_none());
        assert!(matches!(
            restored.user_id().await,
            Err(ClientError::NotAuthenticated)
        ));
        assert_eq!(store.load().await.expect("store"), Some("opaque".into()));
    }

    #[tokio::test]
    async fn set_token_persists_and_clear_forgets() {
        let store = Arc::new(MemoryTokenStore::default());
        let session = Session::new(store.clone());
        let token = token_for("user-2");

        session.set_token(&token).await.expect("set");
        assert_eq!(store.load().await.expect("store"), Some(token));
        assert_eq!(session.user().await.map(|u| u.id), Some("user-2".into()));

        session.clear().await;
        assert!(!session.is_authenticated().await);
        assert!(matches!(
            session.user_id().await,
            Err(ClientError::NotAuthenticated)
        ));
        assert_eq!(store.load().await.expect("store"), None);
    }

    #[tokio::test]
    async fn opaque_token_is_kept_without_user() {
        let session = Session::new(Arc::new(MemoryTokenStore::default()));
        session.set_token("opaque").await.expect("set");
        let state = session.snapshot().await;
        assert_eq!(state.access_token.as_deref(), Some("opaque"));
        assert!(state.user.is_none());
    }
}

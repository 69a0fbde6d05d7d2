use std::sync::Arc;

use crate::{
    api::ApiClient,
    auth::{FileTokenStore, Session, TokenStore},
    config::ClientConfig,
};

/// Everything a caller needs to talk to the backend as the stored user.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ClientConfig>,
    pub session: Arc<Session>,
    pub api: Arc<ApiClient>,
}

impl AppState {
    /// Configuration from the environment, token kept in the configured file.
    pub async fn init() -> anyhow::Result<Self> {
        let config = ClientConfig::from_env()?;
        let store = Arc::new(FileTokenStore::new(config.token_path.clone()));
        Self::with_store(config, store).await
    }

    pub async fn with_store(config: ClientConfig, store: Arc<dyn TokenStore>) -> anyhow::Result<Self> {
        let session = Arc::new(Session::load(store).await?);
        let api = Arc::new(ApiClient::new(&config, session.clone())?);
        Ok(Self {
            config: Arc::new(config),
            session,
            api,
        })
    }
}

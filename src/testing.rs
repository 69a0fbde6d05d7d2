//! In-process mock backend for tests.

use std::sync::Arc;

use axum::{http::HeaderMap, Router};

use crate::{
    api::ApiClient,
    auth::{
        claims::{sign_for_tests, UserClaims},
        session::{MemoryTokenStore, Session},
    },
    config::ClientConfig,
};

pub(crate) const TEST_USER_ID: &str = "665f1c2e9b1d4a0012ab34cd";

/// Serves `app` on an ephemeral port and returns its base URL.
pub(crate) async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend");
    });
    format!("http://{}", addr)
}

pub(crate) async fn client_with_token(base_url: &str, token: Option<&str>) -> ApiClient {
    let session = Arc::new(Session::new(Arc::new(MemoryTokenStore::default())));
    if let Some(token) = token {
        session.set_token(token).await.expect("set token");
    }
    ApiClient::new(&ClientConfig::new(base_url), session).expect("client")
}

/// Client signed in as [`TEST_USER_ID`].
pub(crate) async fn signed_in_client(base_url: &str) -> ApiClient {
    let token = sign_for_tests(&UserClaims {
        id: TEST_USER_ID.into(),
        email: Some("an@example.com".into()),
        username: Some("an".into()),
        role: None,
        iat: None,
        exp: None,
    });
    client_with_token(base_url, Some(&token)).await
}

pub(crate) fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

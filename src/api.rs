//! HTTP client for the SmartDiet backend.
//!
//! Every request carries the session's bearer token. A 401 triggers one token
//! refresh followed by one retry of the original request. Refreshes are
//! single-flight: callers that hit 401 while a refresh is running wait for it
//! and reuse the token it produced.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    auth::{dto::RefreshResponse, session::Session},
    config::ClientConfig,
    error::{ClientError, ClientResult},
};

pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
    refresh_gate: Mutex<()>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<Session>) -> ClientResult<Self> {
        if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base URL must start with http:// or https://, got {:?}",
                config.base_url
            )));
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            // the refresh token travels as a cookie set by /auth/login
            .cookie_store(true)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            session,
            refresh_gate: Mutex::new(()),
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.execute(Method::GET, path, |req| req).await?;
        read_json(response).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.execute(Method::GET, path, |req| req.query(query)).await?;
        read_json(response).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.execute(Method::POST, path, |req| req.json(body)).await?;
        read_json(response).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.execute(Method::PUT, path, |req| req.json(body)).await?;
        read_json(response).await
    }

    /// POST whose response body is not needed.
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let response = self.execute(Method::POST, path, |req| req.json(body)).await?;
        expect_success(response).await
    }

    /// PUT whose response body is not needed.
    pub async fn put_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let response = self.execute(Method::PUT, path, |req| req.json(body)).await?;
        expect_success(response).await
    }

    /// POST without credentials and without the refresh retry (login, register).
    /// Every failure status comes back as `Api` with the server's message.
    pub async fn post_public<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        check_public_status(status, &text)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn post_public_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        check_public_status(status, &text)
    }

    /// Public POST whose reply is used as text.
    pub async fn post_public_text<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<String> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        check_public_status(status, &text)?;
        Ok(text)
    }

    async fn execute<F>(&self, method: Method, path: &str, build: F) -> ClientResult<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let url = self.url(path);
        let token = self.session.access_token().await;
        let response = self.dispatch(&method, &url, token.as_deref(), &build).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        warn!(%method, %url, "request unauthorized; refreshing session");
        let fresh = self.refresh_after(token.as_deref()).await?;
        let retried = self.dispatch(&method, &url, Some(&fresh), &build).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            warn!(%method, %url, "request still unauthorized after refresh");
            return Err(ClientError::Unauthorized);
        }
        Ok(retried)
    }

    async fn dispatch<F>(
        &self,
        method: &Method,
        url: &str,
        token: Option<&str>,
        build: &F,
    ) -> ClientResult<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let mut req = build(self.http.request(method.clone(), url));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let response = req.send().await?;
        debug!(%method, %url, status = %response.status(), "response");
        Ok(response)
    }

    /// Returns a token newer than `stale`, refreshing at most once for all
    /// callers that observed the same stale token.
    async fn refresh_after(&self, stale: Option<&str>) -> ClientResult<String> {
        let _gate = self.refresh_gate.lock().await;

        let current = self.session.access_token().await;
        if current.as_deref() != stale {
            // another caller finished a refresh (or a logout) while we waited
            return current.ok_or(ClientError::SessionExpired);
        }

        match self.request_refresh().await {
            Ok(token) => {
                self.session.set_token(&token).await?;
                info!("access token refreshed");
                Ok(token)
            }
            Err(e) => {
                error!(error = %e, "token refresh failed; clearing session");
                self.session.clear().await;
                Err(ClientError::SessionExpired)
            }
        }
    }

    async fn request_refresh(&self) -> ClientResult<String> {
        let response = self.http.get(self.url("/auth/refresh")).send().await?;
        let body: RefreshResponse = read_json(response).await?;
        Ok(body.access_token)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    let text = response.text().await?;
    check_status(status, &text)?;
    Ok(serde_json::from_str(&text)?)
}

async fn expect_success(response: Response) -> ClientResult<()> {
    let status = response.status();
    let text = response.text().await?;
    check_status(status, &text)
}

fn check_status(status: StatusCode, text: &str) -> ClientResult<()> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND => Err(ClientError::NotFound),
        StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
        _ => Err(ClientError::Api {
            status,
            message: error_message(text),
        }),
    }
}

fn check_public_status(status: StatusCode, text: &str) -> ClientResult<()> {
    if status.is_success() {
        return Ok(());
    }
    Err(ClientError::Api {
        status,
        message: error_message(text),
    })
}

fn error_message(text: &str) -> String {
    serde_json::from_str::<ErrorBody>(text)
        .map(|b| b.message)
        .unwrap_or_else(|_| text.to_string())
}

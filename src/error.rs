use reqwest::StatusCode;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Token refresh failed; the stored credentials were cleared.
    #[error("session expired, please log in again")]
    SessionExpired,
    #[error("not logged in")]
    NotAuthenticated,
    #[error("login succeeded but no access token was returned")]
    MissingToken,
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("server returned {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid access token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("token storage: {0}")]
    Storage(String),
    #[error("reminder interval must be positive, got {0}")]
    InvalidInterval(i64),
    #[error("invalid time {0:?}, expected HH:mm")]
    InvalidTime(String),
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound)
    }

    /// Message suitable for showing to the user as-is.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::SessionExpired => {
                "This account has been offline too long. Please log in again.".to_string()
            }
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

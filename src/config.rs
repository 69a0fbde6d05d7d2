use std::{path::PathBuf, time::Duration};

use anyhow::Context;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TOKEN_FILE: &str = ".smartdiet/token";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Where the command-line client keeps the access token.
    pub token_path: PathBuf,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            token_path: PathBuf::from(DEFAULT_TOKEN_FILE),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("SMARTDIET_BASE_URL").context("SMARTDIET_BASE_URL is not set")?;
        let timeout_secs = std::env::var("SMARTDIET_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let user_agent =
            std::env::var("SMARTDIET_USER_AGENT").unwrap_or_else(|_| default_user_agent());
        let token_path = std::env::var("SMARTDIET_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_FILE));

        Ok(Self {
            timeout: Duration::from_secs(timeout_secs),
            user_agent,
            token_path,
            ..Self::new(base_url)
        })
    }
}

fn default_user_agent() -> String {
    format!("smartdiet/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = ClientConfig::new("http://192.168.1.11:8080/smartdiet/");
        assert_eq!(config.base_url, "http://192.168.1.11:8080/smartdiet");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("smartdiet/"));
    }
}

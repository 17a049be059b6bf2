//! Startup configuration for the pricing API.

use reqwest::Url;
use thiserror::Error;

use crate::util::version::{APP_NAME, APP_VERSION};

/// Environment variable holding the pricing API base URL.
pub const API_URL_ENV: &str = "PRICE_CALCULATOR_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PRICE_CALCULATOR_API_URL is not set")]
    MissingApiUrl,
    #[error("PRICE_CALCULATOR_API_URL is not a valid URL: {0}")]
    InvalidApiUrl(#[from] url::ParseError),
    #[error("PRICE_CALCULATOR_API_URL must be an http(s) URL, got `{0}`")]
    UnsupportedScheme(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
    pub user_agent: String,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(API_URL_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingApiUrl)?;
        Self::with_base_url(&raw)
    }

    pub fn with_base_url(raw: &str) -> Result<Self, ConfigError> {
        let mut base_url = Url::parse(raw)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url.scheme().to_string()));
        }
        // Endpoint paths are joined relative to the base, which needs a trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            user_agent: format!("{}/{}", APP_NAME.replace(' ', "-").to_lowercase(), APP_VERSION),
        })
    }
}

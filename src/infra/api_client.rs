#![allow(dead_code)]

//! Thin asynchronous client for the pricing API.
//!
//! One attempt per call: failures are logged and handed back as
//! [`RequestError`] without retries.

use reqwest::{Client, Method, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::domain::{PriceResult, ShipmentRequest};
use crate::util::config::ApiConfig;

/// Path the price quote is posted to, relative to the base URL.
const QUOTE_PATH: &str = "";

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("{url} responded with HTTP {status}")]
    HttpStatus { status: StatusCode, url: Url },
    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl RequestError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, RequestError> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(RequestError::Build)?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends one request to `path` below the base URL.
    ///
    /// `params` are encoded into the query string for GET; any other method
    /// sends `body` as JSON instead.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        params: Option<&[(&str, &str)]>,
        body: Option<&B>,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let result = self.send(method.clone(), path, params, body).await;
        if let Err(error) = &result {
            tracing::error!(%method, path, %error, "API request failed");
        }
        result
    }

    pub async fn get_json<T>(&self, path: &str) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
    {
        self.request::<T, ()>(Method::GET, path, None, None).await
    }

    pub async fn quote_price(&self, request: &ShipmentRequest) -> Result<PriceResult, RequestError> {
        self.request(Method::POST, QUOTE_PATH, None, Some(request))
            .await
    }

    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        params: Option<&[(&str, &str)]>,
        body: Option<&B>,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let mut builder = self.http.request(method.clone(), url.clone());
        if method == Method::GET {
            if let Some(params) = params {
                builder = builder.query(params);
            }
        } else if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(RequestError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::HttpStatus { status, url });
        }
        response.json::<T>().await.map_err(RequestError::Decode)
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path.trim_start_matches('/'))
    }
}

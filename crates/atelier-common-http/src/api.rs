//! Authenticated JSON API client.
//!
//! Every backend call goes through here: base URL joining, bearer token,
//! status checking and JSON decoding in one place.

use crate::client::{build_client, HttpConfig, HttpError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// A JSON API client bound to one backend base URL and bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// Create a client with the default HTTP configuration.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, HttpError> {
        Self::with_config(base_url, token, HttpConfig::default())
    }

    /// Create a client with a custom HTTP configuration.
    pub fn with_config(
        base_url: impl Into<String>,
        token: impl Into<String>,
        config: HttpConfig,
    ) -> Result<Self, HttpError> {
        Ok(Self {
            inner: build_client(config)?,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the base URL with an endpoint path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Make a GET request and decode the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let response = self
            .inner
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(HttpError::from)?;
        tracing::debug!(status = %response.status(), %url, "GET response");
        Self::decode(response).await
    }

    /// Make a POST request with a JSON body and decode the JSON response.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, HttpError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let response = self
            .inner
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(HttpError::from)?;
        tracing::debug!(status = %response.status(), %url, "POST response");
        Self::decode(response).await
    }

    /// Check the response status and decode the body.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, HttpError> {
        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);

            return Err(HttpError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return if status.is_server_error() {
                Err(HttpError::ServerError {
                    status: status.as_u16(),
                    body,
                })
            } else {
                Err(HttpError::ClientError {
                    status: status.as_u16(),
                    body,
                })
            };
        }

        let bytes = response.bytes().await.map_err(HttpError::Request)?;
        serde_json::from_slice(&bytes).map_err(|e| HttpError::Parse {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).to_string(),
            source: e,
        })
    }
}

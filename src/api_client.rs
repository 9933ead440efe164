use crate::errors::{detail_from_body, ApiError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShortenResponse {
    pub short_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LookupResponse {
    pub original_url: String,
}

/// The Shortening API as seen by the form controller
#[async_trait]
pub trait ShortenApi: Send + Sync {
    /// `POST {api_base}/shorten`
    async fn shorten(&self, request: &ShortenRequest) -> Result<ShortenResponse, ApiError>;

    /// `GET {api_base}/lookup/{short_id}`
    async fn lookup(&self, short_id: &str) -> Result<LookupResponse, ApiError>;
}

/// reqwest-backed client for the Shortening API
#[derive(Clone)]
pub struct HttpShortenApi {
    api_base: String,
    client: reqwest::Client,
}

impl HttpShortenApi {
    /// `api_base` must already be absolute, e.g. `http://localhost:8000/api`.
    pub fn new(api_base: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Same as [`HttpShortenApi::new`] but with a per-request timeout.
    pub fn with_timeout(api_base: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn shorten_endpoint(&self) -> String {
        format!("{}/shorten", self.api_base)
    }

    /// `short_id` is pushed as a single escaped path segment.
    pub fn lookup_endpoint(&self, short_id: &str) -> String {
        let Ok(mut url) = Url::parse(&self.api_base) else {
            return format!("{}/lookup/{}", self.api_base, short_id);
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("lookup").push(short_id);
        }
        url.into()
    }
}

/// Turn a response into the decoded body or a classified error.
async fn decode_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        // An unreadable error body is treated as a body without detail
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::http(status.as_u16(), detail_from_body(&body)));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::transport(format!("invalid response body: {e}")))
}

#[async_trait]
impl ShortenApi for HttpShortenApi {
    async fn shorten(&self, request: &ShortenRequest) -> Result<ShortenResponse, ApiError> {
        let endpoint = self.shorten_endpoint();
        debug!(target: "api", "POST {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        decode_response(response).await
    }

    async fn lookup(&self, short_id: &str) -> Result<LookupResponse, ApiError> {
        let endpoint = self.lookup_endpoint(short_id);
        debug!(target: "api", "GET {}", endpoint);

        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        decode_response(response).await
    }
}

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::ChatClient;
use crate::domain::{CompletionRequest, RelayError, UpstreamResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
const COMPLETIONS_PATH: &str = "/chat/completions";
const MODELS_PATH: &str = "/models";

/// HTTP client for Groq's OpenAI-compatible API.
///
/// Any OpenAI-compatible server works by overriding the base URL. Every call
/// carries a request timeout; an expired timeout or refused connection comes
/// back as an upstream error without status.
pub struct GroqClient {
    client: reqwest::Client,
    /// Base URL without trailing slash, e.g. `https://api.groq.com/openai/v1`.
    base_url: String,
}

impl GroqClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RelayError> {
        let base: String = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                RelayError::configuration(format!("failed to build upstream HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: base.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_defaults() -> Result<Self, RelayError> {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read(response: reqwest::Response) -> Result<UpstreamResponse, RelayError> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            RelayError::Upstream {
                status: Some(status),
                message: format!("failed to read upstream response body: {e}"),
            }
        })?;
        Ok(UpstreamResponse::new(status, body))
    }

    fn transport_error(&self, e: reqwest::Error) -> RelayError {
        let reason = if e.is_timeout() {
            "timed out"
        } else if e.is_connect() {
            "not reachable"
        } else {
            "request failed"
        };
        warn!("GroqClient: upstream {reason} at {}: {e}", self.base_url);
        RelayError::transport(format!("Upstream {reason}: {e}"))
    }
}

#[async_trait]
impl ChatClient for GroqClient {
    async fn create_completion(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<UpstreamResponse, RelayError> {
        let url = format!("{}{}", self.base_url, COMPLETIONS_PATH);
        debug!("GroqClient: POST {url}");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        Self::read(response).await
    }

    async fn list_models(&self, api_key: &str) -> Result<UpstreamResponse, RelayError> {
        let url = format!("{}{}", self.base_url, MODELS_PATH);
        debug!("GroqClient: GET {url}");

        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        Self::read(response).await
    }
}

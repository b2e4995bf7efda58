use async_trait::async_trait;

use crate::domain::{CompletionRequest, RelayError, UpstreamResponse};

/// Transport to an OpenAI-compatible chat-completions service.
///
/// Implementors only move bytes: they return the raw status and body of the
/// exchange and leave classification (error status, response shape) to the
/// caller. A failure to obtain any HTTP response at all is reported as
/// [`RelayError::Upstream`] without a status.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// `POST /chat/completions` with bearer `api_key`.
    async fn create_completion(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<UpstreamResponse, RelayError>;

    /// `GET /models` with bearer `api_key`.
    async fn list_models(&self, api_key: &str) -> Result<UpstreamResponse, RelayError>;
}

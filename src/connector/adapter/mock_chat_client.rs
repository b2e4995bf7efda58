use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::application::ChatClient;
use crate::domain::{CompletionRequest, RelayError, Role, UpstreamResponse};

const MOCK_MODELS: &str =
    r#"{"object":"list","data":[{"id":"mock-echo","owned_by":"groq-relay","active":true}]}"#;

enum Behaviour {
    /// Reply with `Echo: <last user message>`.
    Echo,
    Respond(UpstreamResponse),
    Fail(String),
}

/// In-process stand-in for the upstream API.
///
/// Records every completion request it receives. Responses queued with
/// [`push_response`](Self::push_response) are served first, in order; after that
/// the client falls back to its configured behaviour.
pub struct MockChatClient {
    behaviour: Behaviour,
    queued: Mutex<VecDeque<UpstreamResponse>>,
    requests: Mutex<Vec<CompletionRequest>>,
    api_keys: Mutex<Vec<String>>,
    models_response: UpstreamResponse,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self::with_behaviour(Behaviour::Echo)
    }

    /// Always answers 200 with `reply` as the first choice content.
    pub fn with_reply(reply: &str) -> Self {
        Self::with_behaviour(Behaviour::Respond(completion_body(reply)))
    }

    pub fn with_response(response: UpstreamResponse) -> Self {
        Self::with_behaviour(Behaviour::Respond(response))
    }

    pub fn with_transport_error(message: impl Into<String>) -> Self {
        Self::with_behaviour(Behaviour::Fail(message.into()))
    }

    pub fn with_models_response(mut self, response: UpstreamResponse) -> Self {
        self.models_response = response;
        self
    }

    fn with_behaviour(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            queued: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            api_keys: Mutex::new(Vec::new()),
            models_response: UpstreamResponse::new(200, MOCK_MODELS),
        }
    }

    pub fn push_response(&self, response: UpstreamResponse) {
        lock(&self.queued).push_back(response);
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn last_api_key(&self) -> Option<String> {
        lock(&self.api_keys).last().cloned()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

/// A poisoned lock only means another test thread panicked; the data is still usable.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 200 response in chat-completions shape carrying `content`.
pub fn completion_body(content: &str) -> UpstreamResponse {
    let body = serde_json::json!({
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    });
    UpstreamResponse::new(200, body.to_string())
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn create_completion(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<UpstreamResponse, RelayError> {
        lock(&self.requests).push(request.clone());
        lock(&self.api_keys).push(api_key.to_string());

        if let Some(queued) = lock(&self.queued).pop_front() {
            return Ok(queued);
        }

        match &self.behaviour {
            Behaviour::Echo => {
                let last_user = request
                    .messages
                    .iter()
                    .rev()
                    .find(|t| t.role() == Role::User)
                    .map(|t| t.content())
                    .unwrap_or_default();
                debug!("MockChatClient echoing {} chars", last_user.len());
                Ok(completion_body(&format!("Echo: {last_user}")))
            }
            Behaviour::Respond(response) => Ok(response.clone()),
            Behaviour::Fail(message) => Err(RelayError::transport(message.clone())),
        }
    }

    async fn list_models(&self, _api_key: &str) -> Result<UpstreamResponse, RelayError> {
        Ok(self.models_response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConversationTurn, GenerationParams};

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest::new(
            "mock",
            vec![ConversationTurn::system("sys"), ConversationTurn::user(text)],
            GenerationParams::default(),
        )
    }

    #[tokio::test]
    async fn echoes_last_user_message() {
        let client = MockChatClient::new();
        let response = client.create_completion("k", &request("ping")).await.unwrap();
        assert!(response.is_success());
        assert!(response.body.contains("Echo: ping"));
    }

    #[tokio::test]
    async fn queued_responses_are_served_first() {
        let client = MockChatClient::with_reply("steady");
        client.push_response(UpstreamResponse::new(503, "busy"));

        let first = client.create_completion("k", &request("a")).await.unwrap();
        let second = client.create_completion("k", &request("b")).await.unwrap();

        assert_eq!(first.status, 503);
        assert!(second.body.contains("steady"));
        assert_eq!(client.call_count(), 2);
    }
}

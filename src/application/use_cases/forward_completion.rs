use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::ChatClient;
use crate::domain::{
    CompletionRequest, ConversationTurn, GenerationParams, RelayError, API_KEY_ENV,
};

pub const DEFAULT_MODEL: &str = "llama-3.2-1b-preview";

/// Persona instruction placed in front of every conversation.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant. You provide clear, concise, \
and accurate responses. Keep your responses natural and conversational. If you're not sure \
about something, be honest about it.";

const NO_MESSAGE: &str = "No message provided";

/// Minimal subset of the chat-completions response we read. Every level is
/// optional so a shape mismatch can be reported precisely instead of as a
/// generic decode failure.
#[derive(Deserialize)]
struct ApiResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Everything the forwarder needs besides the transport.
#[derive(Clone)]
pub struct CompletionSettings {
    api_key: Option<String>,
    model: String,
    system_prompt: String,
    generation: GenerationParams,
}

impl CompletionSettings {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            generation: GenerationParams::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_generation(mut self, generation: GenerationParams) -> Self {
        self.generation = generation;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn generation(&self) -> GenerationParams {
        self.generation
    }
}

// The credential never reaches a log line.
impl fmt::Debug for CompletionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSettings")
            .field(
                "api_key",
                &if self.api_key.is_some() { "configured" } else { "missing" },
            )
            .field("model", &self.model)
            .field("generation", &self.generation)
            .finish()
    }
}

/// Turns one user message plus prior turns into an upstream reply.
///
/// The forwarder is stateless: it reads the history it is handed and never
/// records anything. Recording the exchange is the caller's job, and only
/// after `forward` returned `Ok`.
pub struct CompletionForwarder {
    client: Arc<dyn ChatClient>,
    settings: CompletionSettings,
}

impl CompletionForwarder {
    pub fn new(client: Arc<dyn ChatClient>, settings: CompletionSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    /// System turn, then `history` in order, then the new user turn.
    pub fn build_request(&self, user_text: &str, history: &[ConversationTurn]) -> CompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ConversationTurn::system(self.settings.system_prompt.as_str()));
        messages.extend(history.iter().cloned());
        messages.push(ConversationTurn::user(user_text));

        CompletionRequest::new(self.settings.model.as_str(), messages, self.settings.generation)
    }

    pub async fn forward(
        &self,
        user_text: Option<&str>,
        history: &[ConversationTurn],
    ) -> Result<String, RelayError> {
        let api_key = self.settings.api_key.as_deref().ok_or_else(|| {
            warn!("Rejecting chat request: {API_KEY_ENV} is not set");
            RelayError::missing_api_key()
        })?;

        let user_text = match user_text {
            Some(text) if !text.is_empty() => text,
            _ => {
                debug!(input_present = user_text.is_some(), "Rejecting empty chat message");
                return Err(RelayError::validation(NO_MESSAGE));
            }
        };

        let request = self.build_request(user_text, history);
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            history = history.len(),
            "Sending completion request upstream"
        );

        let response = self.client.create_completion(api_key, &request).await?;
        debug!(status = response.status, "Upstream responded");

        if !response.is_success() {
            warn!(status = response.status, body = %response.body, "Upstream returned an error status");
            return Err(RelayError::upstream(
                response.status,
                format!("API Error: {}", response.body),
            ));
        }

        Self::extract_reply(&response.body)
    }

    /// Pull `choices[0].message.content` out of a 2xx body.
    fn extract_reply(body: &str) -> Result<String, RelayError> {
        let parsed: ApiResponse = serde_json::from_str(body)
            .map_err(|e| RelayError::protocol(format!("failed to parse response body: {e}")))?;

        let choice = parsed
            .choices
            .ok_or_else(|| RelayError::protocol("response has no `choices` field"))?
            .into_iter()
            .next()
            .ok_or_else(|| RelayError::protocol("`choices` is empty"))?;

        choice
            .message
            .ok_or_else(|| RelayError::protocol("first choice has no `message`"))?
            .content
            .ok_or_else(|| RelayError::protocol("first choice message has no `content`"))
    }
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::application::{
    ChatClient, ChatUseCase, CompletionForwarder, CompletionSettings, ListModelsUseCase,
    SharedConversation, DEFAULT_MODEL,
};
use crate::connector::{GroqClient, MockChatClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::domain::{ConversationWindow, GenerationParams, RelayError, DEFAULT_MAX_TURNS};

pub struct ContainerConfig {
    /// Upstream credential. Its absence is not fatal at startup; chat requests
    /// answer with a configuration error until it is set.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub generation: GenerationParams,
    /// Upper bound on remembered turns. Must be a positive even number.
    pub max_turns: usize,
    pub history_enabled: bool,
    pub timeout_secs: u64,
    /// Answer locally with an echo client instead of calling the upstream API.
    pub mock_upstream: bool,
}

impl ContainerConfig {
    pub fn validate(&self) -> Result<(), RelayError> {
        ConversationWindow::check_max_turns(self.max_turns)?;
        if self.timeout_secs == 0 {
            return Err(RelayError::configuration("upstream timeout must be at least 1 second"));
        }
        if let Some(t) = self.generation.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(RelayError::configuration(format!(
                    "temperature must be between 0 and 2, got {t}"
                )));
            }
        }
        if self.model.trim().is_empty() {
            return Err(RelayError::configuration("model name must not be empty"));
        }
        Ok(())
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            generation: GenerationParams::default(),
            max_turns: DEFAULT_MAX_TURNS,
            history_enabled: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            mock_upstream: false,
        }
    }
}

/// Owns the long-lived pieces of the relay: the upstream client, the forwarder
/// and the single conversation window.
pub struct Container {
    chat_client: Arc<dyn ChatClient>,
    forwarder: Arc<CompletionForwarder>,
    conversation: Arc<SharedConversation>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let chat_client: Arc<dyn ChatClient> = if config.mock_upstream {
            debug!("Using mock upstream client");
            Arc::new(MockChatClient::new())
        } else {
            debug!("Using upstream at {}", config.base_url);
            Arc::new(GroqClient::new(
                config.base_url.as_str(),
                Duration::from_secs(config.timeout_secs),
            )?)
        };

        Self::with_client(config, chat_client)
    }

    /// Build around an already constructed client.
    pub fn with_client(config: ContainerConfig, chat_client: Arc<dyn ChatClient>) -> Result<Self> {
        config.validate()?;

        let settings = CompletionSettings::new(config.api_key.clone())
            .with_model(config.model.as_str())
            .with_generation(config.generation);
        let forwarder = Arc::new(CompletionForwarder::new(chat_client.clone(), settings));
        let conversation = Arc::new(SharedConversation::new(ConversationWindow::new(
            config.max_turns,
        )?));

        Ok(Self {
            chat_client,
            forwarder,
            conversation,
            config,
        })
    }

    pub fn chat_use_case(&self) -> ChatUseCase {
        let use_case = ChatUseCase::new(self.forwarder.clone(), self.conversation.clone());
        if self.config.history_enabled {
            use_case
        } else {
            use_case.without_history()
        }
    }

    pub fn list_models_use_case(&self) -> ListModelsUseCase {
        ListModelsUseCase::new(self.chat_client.clone(), self.config.api_key.clone())
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn api_key_configured(&self) -> bool {
        self.forwarder.settings().has_api_key()
    }
}

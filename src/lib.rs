pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    ChatClient, ChatUseCase, CompletionForwarder, CompletionSettings, HistoryStatus,
    ListModelsUseCase, SharedConversation, DEFAULT_MODEL, SYSTEM_PROMPT,
};

pub use cli::{Commands, EnvMode, ServeArgs};

pub use connector::api::{build_router, serve, ApiError, Container, ContainerConfig};
pub use connector::{completion_body, GroqClient, MockChatClient};

pub use domain::{
    CompletionRequest, ConversationTurn, ConversationWindow, GenerationParams, ModelInfo,
    RelayError, Role, UpstreamResponse, API_KEY_ENV,
};

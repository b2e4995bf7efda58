use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::RelayError;

use super::super::{ApiError, Container};

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn chat(
        &self,
        payload: Result<Json<ChatRequest>, JsonRejection>,
    ) -> Result<Json<ChatResponse>, ApiError> {
        let span = info_span!("chat", request_id = %Uuid::new_v4());

        async move {
            let request = match payload {
                Ok(Json(request)) => request,
                Err(rejection) => {
                    warn!(reason = %rejection.body_text(), "Rejecting malformed chat request");
                    return Err(ApiError::from(RelayError::validation(format!(
                        "Invalid request body: {}",
                        rejection.body_text()
                    ))));
                }
            };

            info!(
                input_present = request.message.is_some(),
                input_chars = request.message.as_deref().map_or(0, |m| m.chars().count()),
                "Processing chat message"
            );

            let use_case = self.container.chat_use_case();
            match use_case.execute(request.message.as_deref()).await {
                Ok(reply) => Ok(Json(ChatResponse { response: reply })),
                Err(e) => {
                    warn!(
                        kind = e.kind(),
                        upstream_status = ?e.upstream_status(),
                        "Chat request failed: {e}"
                    );
                    Err(ApiError::from(e))
                }
            }
        }
        .instrument(span)
        .await
    }
}

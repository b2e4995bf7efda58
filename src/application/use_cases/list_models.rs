use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::application::ChatClient;
use crate::domain::{ModelInfo, RelayError};

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelInfo>,
}

/// Enumerates the models the configured credential can use.
pub struct ListModelsUseCase {
    client: Arc<dyn ChatClient>,
    api_key: Option<String>,
}

impl ListModelsUseCase {
    pub fn new(client: Arc<dyn ChatClient>, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Models sorted by id.
    pub async fn execute(&self) -> Result<Vec<ModelInfo>, RelayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(RelayError::missing_api_key)?;

        let response = self.client.list_models(api_key).await?;
        if !response.is_success() {
            return Err(RelayError::upstream(
                response.status,
                format!("API Error: {}", response.body),
            ));
        }

        let mut models = serde_json::from_str::<ModelList>(&response.body)
            .map_err(|e| RelayError::protocol(format!("failed to parse model list: {e}")))?
            .data;
        models.sort_by(|a, b| a.id.cmp(&b.id));
        debug!("Upstream lists {} models", models.len());

        Ok(models)
    }
}

use serde::{Deserialize, Serialize};

/// One entry of the upstream `GET /models` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub owned_by: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub context_window: Option<u64>,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owned_by: None,
            active: None,
            context_window: None,
        }
    }

    /// Models without an explicit `active` flag are treated as available.
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }
}

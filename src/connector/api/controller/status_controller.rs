use serde::Serialize;

use crate::application::HistoryStatus;

use super::super::Container;

const RUNNING: &str = "Groq Chat API is running!";

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub model: String,
    pub api_key_configured: bool,
    pub history: HistoryStatus,
}

pub struct StatusController<'a> {
    container: &'a Container,
}

impl<'a> StatusController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub fn status(&self) -> StatusResponse {
        let history = self.container.chat_use_case().history_status();
        StatusResponse {
            status: "ok",
            message: RUNNING,
            model: self.container.model().to_string(),
            api_key_configured: self.container.api_key_configured(),
            history,
        }
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::domain::{ConversationWindow, RelayError};

use super::CompletionForwarder;

/// Point-in-time view of the conversation window, for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryStatus {
    pub enabled: bool,
    pub turns: usize,
    pub max_turns: usize,
}

/// The process-wide conversation window plus a lock-free copy of its length.
///
/// `lock` serializes whole exchanges and may be held for the duration of an
/// upstream call. `turns` never waits on that lock; it reports the length as of
/// the last completed exchange.
pub struct SharedConversation {
    window: Mutex<ConversationWindow>,
    turns: AtomicUsize,
    max_turns: usize,
}

impl SharedConversation {
    pub fn new(window: ConversationWindow) -> Self {
        Self {
            turns: AtomicUsize::new(window.len()),
            max_turns: window.max_turns(),
            window: Mutex::new(window),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, ConversationWindow> {
        self.window.lock().await
    }

    pub fn turns(&self) -> usize {
        self.turns.load(Ordering::Acquire)
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    fn publish(&self, window: &ConversationWindow) {
        self.turns.store(window.len(), Ordering::Release);
    }
}

impl Default for SharedConversation {
    fn default() -> Self {
        Self::new(ConversationWindow::default())
    }
}

/// Handles one inbound chat message against the single process-wide conversation.
///
/// The window lock is held from snapshot to record, so concurrent requests are
/// served one at a time and never interleave their updates. With history
/// disabled the window is neither read nor written and requests run unserialized.
pub struct ChatUseCase {
    forwarder: Arc<CompletionForwarder>,
    conversation: Arc<SharedConversation>,
    history_enabled: bool,
}

impl ChatUseCase {
    pub fn new(forwarder: Arc<CompletionForwarder>, conversation: Arc<SharedConversation>) -> Self {
        Self {
            forwarder,
            conversation,
            history_enabled: true,
        }
    }

    pub fn without_history(mut self) -> Self {
        self.history_enabled = false;
        self
    }

    pub async fn execute(&self, message: Option<&str>) -> Result<String, RelayError> {
        if !self.history_enabled {
            return self.forwarder.forward(message, &[]).await;
        }

        let mut window = self.conversation.lock().await;
        let history = window.snapshot();

        let reply = self.forwarder.forward(message, &history).await?;

        if let Some(user_text) = message {
            window.record(user_text, reply.as_str());
            self.conversation.publish(&window);
            debug!(turns = window.len(), "Recorded exchange in conversation window");
        }
        info!(reply_chars = reply.chars().count(), "Chat exchange completed");

        Ok(reply)
    }

    /// Never waits for an in-flight exchange.
    pub fn history_status(&self) -> HistoryStatus {
        HistoryStatus {
            enabled: self.history_enabled,
            turns: self.conversation.turns(),
            max_turns: self.conversation.max_turns(),
        }
    }
}

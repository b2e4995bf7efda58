use std::collections::VecDeque;

use super::ConversationTurn;
use crate::domain::RelayError;

/// Five user/assistant exchanges.
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Bounded buffer of the most recent turns of the conversation, oldest first.
///
/// Turns only ever enter in user/assistant pairs through [`record`](Self::record),
/// and eviction removes the two oldest turns at a time, so a pair is never split.
/// The window is not synchronized; callers that share it across requests wrap it
/// in a lock and hold that lock across snapshot, upstream call and record.
#[derive(Debug, Clone)]
pub struct ConversationWindow {
    turns: VecDeque<ConversationTurn>,
    max_turns: usize,
}

impl ConversationWindow {
    /// Fails unless `max_turns` is a positive even number.
    pub fn new(max_turns: usize) -> Result<Self, RelayError> {
        Self::check_max_turns(max_turns)?;
        Ok(Self::with_bound(max_turns))
    }

    pub fn check_max_turns(max_turns: usize) -> Result<(), RelayError> {
        if max_turns == 0 || max_turns % 2 != 0 {
            return Err(RelayError::configuration_with_hint(
                format!("max turns must be a positive even number, got {max_turns}"),
                "Turns are kept as user/assistant pairs",
            ));
        }
        Ok(())
    }

    fn with_bound(max_turns: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_turns + 2),
            max_turns,
        }
    }

    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.turns.iter().cloned().collect()
    }

    pub fn record(&mut self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        self.turns.push_back(ConversationTurn::user(user_text));
        self.turns.push_back(ConversationTurn::assistant(assistant_text));

        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
            self.turns.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }
}

impl Default for ConversationWindow {
    fn default() -> Self {
        Self::with_bound(DEFAULT_MAX_TURNS)
    }
}

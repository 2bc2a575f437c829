//! Sliding-window conversation history.
//!
//! `HistoryBuffer` keeps at most `max_turns` of the most recent turns and
//! renders them, plus the pending user message, into the prompt text sent
//! to the generation backend.

use std::collections::VecDeque;

use parley_types::chat::{BOT_LABEL, Turn, USER_LABEL};
use parley_types::config::DEFAULT_MAX_TURNS;

/// Bounded, insertion-ordered window of completed turns.
///
/// The bound is enforced on every `append` by evicting the oldest turns
/// first, so `len() <= max_turns()` always holds.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    turns: VecDeque<Turn>,
    max_turns: usize,
}

impl HistoryBuffer {
    /// Create an empty buffer that retains at most `max_turns` turns.
    ///
    /// A bound of zero is allowed: every prompt is then built from the
    /// pending message alone.
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_turns),
            max_turns,
        }
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Stored turns, oldest first.
    pub fn turns(&self) -> impl ExactSizeIterator<Item = &Turn> {
        self.turns.iter()
    }

    /// The most recently appended turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.back()
    }

    /// Record a completed exchange, evicting the oldest turns past the bound.
    pub fn append(&mut self, user_message: impl Into<String>, bot_response: impl Into<String>) {
        self.turns.push_back(Turn::new(user_message, bot_response));
        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
        }
    }

    /// Drop every stored turn. The bound is unchanged.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Render the window and the pending message as prompt text.
    ///
    /// Layout, one entry per line joined by `\n`:
    ///
    /// ```text
    /// User: <oldest user message>
    /// Bot: <oldest bot response>
    /// ...
    /// User: <pending message>
    /// Bot:
    /// ```
    ///
    /// The text ends with the open `Bot:` label and no trailing newline so
    /// the backend continues with the bot's reply.
    pub fn format_context(&self, pending_user_message: &str) -> String {
        let mut prompt = String::new();
        for turn in &self.turns {
            push_line(&mut prompt, USER_LABEL, turn.user_message());
            push_line(&mut prompt, BOT_LABEL, turn.bot_response());
        }
        push_line(&mut prompt, USER_LABEL, pending_user_message);
        prompt.push_str(BOT_LABEL);
        prompt
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

fn push_line(buf: &mut String, label: &str, text: &str) {
    buf.push_str(label);
    buf.push(' ');
    buf.push_str(text);
    buf.push('\n');
}

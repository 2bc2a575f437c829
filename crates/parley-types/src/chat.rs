//! Conversation turn and session state types for parley.
//!
//! A `Turn` is one completed user/bot exchange. `SessionState` models the
//! conversation loop's lifecycle (awaiting input, generating, done).

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Label prefixed to user lines in the prompt.
pub const USER_LABEL: &str = "User:";

/// Label prefixed to bot lines in the prompt. The prompt always ends with
/// this label so the backend continues with the bot's reply.
pub const BOT_LABEL: &str = "Bot:";

/// One completed exchange: the user's message and the bot's reply.
///
/// Turns are immutable once created; the fields are only exposed through
/// accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    user_message: String,
    bot_response: String,
}

impl Turn {
    pub fn new(user_message: impl Into<String>, bot_response: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            bot_response: bot_response.into(),
        }
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn bot_response(&self) -> &str {
        &self.bot_response
    }
}

/// Lifecycle state of a conversation loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    AwaitingInput,
    Generating,
    Done,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::AwaitingInput => write!(f, "awaiting_input"),
            SessionState::Generating => write!(f, "generating"),
            SessionState::Done => write!(f, "done"),
        }
    }
}

impl FromStr for SessionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "awaiting_input" => Ok(SessionState::AwaitingInput),
            "generating" => Ok(SessionState::Generating),
            "done" => Ok(SessionState::Done),
            other => Err(format!("invalid session state: '{other}'")),
        }
    }
}

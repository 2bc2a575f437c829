//! Conversation state: the sliding-window history, reply extraction and
//! the per-turn session state machine.

pub mod extract;
pub mod history;
pub mod session;

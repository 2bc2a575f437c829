//! Shared domain types for parley.
//!
//! Conversation turns, generation request/parameter types, configuration
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;

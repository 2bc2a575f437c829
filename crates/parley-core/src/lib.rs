//! Conversation logic and backend traits for parley.
//!
//! This crate defines the `TextGenerator` port that the infrastructure
//! layer implements, and the history window / turn handling built on it.
//! It depends only on `parley-types` -- never on `parley-infra` or any
//! network crate.

pub mod chat;
pub mod llm;

//! Infrastructure layer for parley.
//!
//! Contains the HTTP implementations of the `TextGenerator` trait defined
//! in `parley-core` and the TOML configuration loader.

pub mod config;
pub mod llm;

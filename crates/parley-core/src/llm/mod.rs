//! Generation backend abstractions for parley.
//!
//! - `TextGenerator`: RPITIT trait for concrete backend implementations
//! - `BoxTextGenerator`: Object-safe wrapper for dynamic dispatch

pub mod box_provider;
pub mod provider;

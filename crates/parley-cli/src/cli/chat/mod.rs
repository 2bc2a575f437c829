//! Interactive chat experience for parley.
//!
//! Implements the terminal side of the conversation loop: readline input,
//! slash commands, a thinking spinner, markdown rendering and the welcome
//! banner. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;

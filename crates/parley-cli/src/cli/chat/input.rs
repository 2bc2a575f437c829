//! Async input handling for the chat loop.
//!
//! On a terminal, wraps `rustyline_async::Readline` for line editing with
//! proper handling of EOF (Ctrl+D) and interrupt (Ctrl+C). When stdin is
//! piped, lines are read directly so transcripts can be scripted.

use std::io::{IsTerminal, Write};

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Events produced by the input handler.
#[derive(Debug, PartialEq)]
pub enum InputEvent {
    /// User submitted a line (trimmed).
    Message(String),
    /// End of file (Ctrl+D or end of piped input).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

enum Source {
    Terminal(Readline),
    Piped(Lines<BufReader<Stdin>>),
}

/// Async line reader for the chat loop.
pub struct ChatInput {
    source: Source,
}

/// Where chat output goes while input is active.
///
/// On a terminal this is the readline `SharedWriter`, which keeps output
/// from clobbering the prompt line.
pub enum ChatOutput {
    Terminal(SharedWriter),
    Plain(std::io::Stdout),
}

impl Write for ChatOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            ChatOutput::Terminal(w) => w.write(buf),
            ChatOutput::Plain(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            ChatOutput::Terminal(w) => w.flush(),
            ChatOutput::Plain(w) => w.flush(),
        }
    }
}

impl ChatInput {
    /// Create an input handler with the given prompt.
    ///
    /// Returns the handler and the writer chat output should go through.
    pub fn new(prompt: String) -> Result<(Self, ChatOutput), ReadlineError> {
        if std::io::stdin().is_terminal() {
            let (rl, writer) = Readline::new(prompt)?;
            Ok((
                Self {
                    source: Source::Terminal(rl),
                },
                ChatOutput::Terminal(writer),
            ))
        } else {
            let lines = BufReader::new(tokio::io::stdin()).lines();
            Ok((
                Self {
                    source: Source::Piped(lines),
                },
                ChatOutput::Plain(std::io::stdout()),
            ))
        }
    }

    /// Whether input comes from an interactive terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self.source, Source::Terminal(_))
    }

    /// Read a line of input.
    ///
    /// Read errors are reported as `Eof` so the loop ends cleanly.
    pub async fn read_line(&mut self) -> InputEvent {
        match &mut self.source {
            Source::Terminal(rl) => match rl.readline().await {
                Ok(ReadlineEvent::Line(line)) => {
                    let trimmed = line.trim().to_string();
                    if !trimmed.is_empty() {
                        rl.add_history_entry(trimmed.clone());
                    }
                    InputEvent::Message(trimmed)
                }
                Ok(ReadlineEvent::Eof) => InputEvent::Eof,
                Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
                Err(e) => {
                    tracing::debug!(error = %e, "Readline failed");
                    InputEvent::Eof
                }
            },
            Source::Piped(lines) => match lines.next_line().await {
                Ok(Some(line)) => InputEvent::Message(line.trim().to_string()),
                Ok(None) => InputEvent::Eof,
                Err(e) => {
                    tracing::debug!(error = %e, "Reading stdin failed");
                    InputEvent::Eof
                }
            },
        }
    }

    /// Clear the terminal screen. No-op for piped input.
    pub fn clear(&mut self) {
        if let Source::Terminal(rl) = &mut self.source {
            let _ = rl.clear();
        }
    }

    /// Restore the terminal before exiting.
    pub fn finish(&mut self) {
        if let Source::Terminal(rl) = &mut self.source {
            let _ = rl.flush();
        }
    }
}

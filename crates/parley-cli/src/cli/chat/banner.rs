//! Welcome banner display for chat sessions.
//!
//! Printed before the readline prompt takes over the terminal.

use std::io::{self, Write};

use console::style;

/// Write the welcome banner at the start of a chat session.
///
/// Shows the backend, model, window size and session ID, plus a hint about
/// slash commands and the exit command.
pub fn print_welcome_banner(
    out: &mut impl Write,
    backend: &str,
    model: &str,
    max_turns: usize,
    session_id: &str,
    exit_command: &str,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {} {}", style("*").cyan(), style("parley").cyan().bold())?;
    writeln!(out)?;
    writeln!(out, "  {}  {}", style("Backend:").bold(), style(backend).dim())?;
    writeln!(out, "  {}    {}", style("Model:").bold(), style(model).dim())?;
    writeln!(
        out,
        "  {}   {}",
        style("Window:").bold(),
        style(format!("last {max_turns} turns")).dim()
    )?;
    writeln!(
        out,
        "  {}  {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "  {}",
        style(format!("Type /help for commands, {exit_command} or Ctrl+D to exit")).dim()
    )?;
    writeln!(out, "  {}", style("---").dim())?;
    writeln!(out)?;
    out.flush()
}

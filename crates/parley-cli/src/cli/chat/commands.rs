//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls. Text that starts
//! with `/` but names no known command is an ordinary message and goes to
//! the model. The exit command is configurable and handled by the session.

use std::io::{self, Write};

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Forget the conversation window.
    Reset,
    /// Show the turns currently in the window.
    History,
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input is not a known command.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') || trimmed.contains(char::is_whitespace) {
        return None;
    }

    match trimmed.to_lowercase().as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/reset" => Some(ChatCommand::Reset),
        "/history" => Some(ChatCommand::History),
        _ => None,
    }
}

/// Write the help text listing all available commands.
pub fn print_help(out: &mut impl Write, exit_command: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {}", style("Available commands:").bold())?;
    writeln!(out)?;
    writeln!(out, "  {:<10} Show this help message", style("/help").cyan())?;
    writeln!(out, "  {:<10} Clear the screen", style("/clear").cyan())?;
    writeln!(out, "  {:<10} Forget the conversation so far", style("/reset").cyan())?;
    writeln!(out, "  {:<10} Show the remembered turns", style("/history").cyan())?;
    writeln!(out, "  {:<10} End the chat session", style(exit_command).cyan())?;
    writeln!(out)?;
    writeln!(out, "  {}", style("Ctrl+D to exit, Ctrl+C is safe").dim())?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
        assert_eq!(parse("  /HELP  "), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_clear() {
        assert_eq!(parse("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse("/cls"), Some(ChatCommand::Clear));
    }

    #[test]
    fn test_parse_reset_and_history() {
        assert_eq!(parse("/reset"), Some(ChatCommand::Reset));
        assert_eq!(parse("/history"), Some(ChatCommand::History));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello world"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_parse_unknown_goes_to_model() {
        assert_eq!(parse("/foo"), None);
        assert_eq!(parse("/exit"), None);
        assert_eq!(parse("/help me with this"), None);
    }

    #[test]
    fn test_print_help_mentions_exit_command() {
        let mut buf = Vec::new();
        print_help(&mut buf, "/bye").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("/bye"));
        assert!(text.contains("/reset"));
    }
}

//! Main chat loop orchestration.
//!
//! Coordinates the conversation lifecycle: backend setup, session creation,
//! welcome banner, input loop with slash commands and a thinking spinner,
//! and session teardown. Turn semantics live in `ChatSession`.

use std::io::{IsTerminal, Write};
use std::time::{Duration, Instant};

use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use tracing::{debug, info};

use parley_core::chat::history::HistoryBuffer;
use parley_core::chat::session::{ChatSession, TurnOutcome};
use parley_core::llm::box_provider::BoxTextGenerator;
use parley_types::config::ChatConfig;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Longest message preview shown by `/history`.
const PREVIEW_CHARS: usize = 100;

/// Run the interactive chat loop until the exit command or EOF.
pub async fn run_chat_loop(
    generator: BoxTextGenerator,
    config: &ChatConfig,
    markdown: bool,
) -> anyhow::Result<()> {
    let mut session = ChatSession::new(generator, config);
    let session_id = session.id().to_string();
    info!(session = %session_id, backend = session.generator().name(), "Chat session started");

    // The banner goes out before readline switches the terminal to raw mode
    if std::io::stdin().is_terminal() {
        print_welcome_banner(
            &mut std::io::stdout(),
            session.generator().name(),
            session.generator().model(),
            config.max_turns,
            &session_id,
            session.exit_command(),
        )?;
    }

    let prompt = format!("{} ", style("User:").green().bold());
    let (mut chat_input, mut out) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let markdown = markdown && chat_input.is_interactive();
    let renderer = ChatRenderer::new(Some(crossterm::style::Color::Cyan), markdown);

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                session.finish();
                break;
            }
            InputEvent::Interrupted => {
                writeln!(
                    out,
                    "  {}",
                    style(format!(
                        "Type {} or press Ctrl+D to exit, or keep chatting.",
                        session.exit_command()
                    ))
                    .dim()
                )?;
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if !session.is_exit_command(&text) {
            if let Some(cmd) = commands::parse(&text) {
                match cmd {
                    ChatCommand::Help => commands::print_help(&mut out, session.exit_command())?,
                    ChatCommand::Clear => chat_input.clear(),
                    ChatCommand::Reset => {
                        session.reset();
                        writeln!(out, "  {}", style("Conversation cleared.").dim())?;
                    }
                    ChatCommand::History => print_history(&mut out, session.history())?,
                }
                continue;
            }
        }

        let spinner = chat_input.is_interactive().then(thinking_spinner);
        let start_time = Instant::now();
        let outcome = session.handle_line(&text).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        match outcome {
            TurnOutcome::Exit => break,
            TurnOutcome::Reply(reply) => {
                let response_ms = start_time.elapsed().as_millis() as u64;
                let rendered = renderer.render_final(&reply);
                writeln!(out, "{} {}", style("Bot:").cyan().bold(), rendered.trim_end())?;
                if chat_input.is_interactive() {
                    writeln!(
                        out,
                        "{}",
                        renderer.stats_footer(
                            response_ms,
                            session.turn_count(),
                            session.history().len(),
                            session.history().max_turns(),
                        )
                    )?;
                }
            }
            TurnOutcome::Failed(e) => {
                writeln!(
                    out,
                    "{} Sorry, something went wrong: {e}",
                    style("!").red().bold()
                )?;
            }
        }
    }

    if chat_input.is_interactive() {
        writeln!(out, "\n  {}", style("Session ended.").dim())?;
    }
    out.flush()?;
    chat_input.finish();

    debug!(
        session = %session_id,
        state = %session.state(),
        turns = session.turn_count(),
        "Chat session finished"
    );
    Ok(())
}

fn thinking_spinner() -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Write the current window as a table, oldest turn first.
fn print_history(out: &mut impl Write, history: &HistoryBuffer) -> std::io::Result<()> {
    if history.is_empty() {
        writeln!(out, "  {}", style("No turns remembered yet.").dim())?;
        return Ok(());
    }

    writeln!(out, "{}", history_table(history))?;
    writeln!(
        out,
        "  {}",
        style(format!("{} of {} turns", history.len(), history.max_turns())).dim()
    )
}

fn history_table(history: &HistoryBuffer) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("User").fg(Color::White),
        Cell::new("Bot").fg(Color::White),
    ]);

    for (i, turn) in history.turns().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).fg(Color::DarkGrey),
            Cell::new(preview(turn.user_message())).fg(Color::Green),
            Cell::new(preview(turn.bot_response())).fg(Color::Cyan),
        ]);
    }
    table
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(150);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS);
        assert!(p.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_history_table_lists_turns_oldest_first() {
        let mut history = HistoryBuffer::new(2);
        history.append("first", "one");
        history.append("second", "two");
        history.append("third", "three");

        let rendered = history_table(&history).to_string();
        assert!(!rendered.contains("first"));
        let second = rendered.find("second").unwrap();
        let third = rendered.find("third").unwrap();
        assert!(second < third);
    }

    #[test]
    fn test_print_history_empty() {
        let mut buf = Vec::new();
        print_history(&mut buf, &HistoryBuffer::new(5)).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("No turns"));
    }
}

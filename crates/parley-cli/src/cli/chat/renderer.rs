//! Terminal markdown rendering with syntax-highlighted code blocks.
//!
//! Replies are printed verbatim by default, so what the user reads is
//! exactly what the history records. With markdown enabled, `ChatRenderer`
//! combines `termimad` for prose and `syntect` for code block highlighting.

use crossterm::style::Color;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

/// A run of reply text: prose or a fenced code block.
#[derive(Debug, PartialEq)]
pub enum Segment<'a> {
    Prose(&'a str),
    Code { lang: String, code: String },
}

/// Split markdown into prose lines and fenced code blocks.
///
/// An unclosed fence runs to the end of the text.
pub fn split_segments(markdown: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut code: Option<(String, String)> = None;

    for line in markdown.lines() {
        if line.trim_start().starts_with("```") {
            match code.take() {
                Some((lang, text)) => segments.push(Segment::Code { lang, code: text }),
                None => {
                    let lang = line.trim_start().trim_start_matches('`').trim().to_string();
                    code = Some((lang, String::new()));
                }
            }
        } else if let Some((_, buf)) = code.as_mut() {
            buf.push_str(line);
            buf.push('\n');
        } else {
            segments.push(Segment::Prose(line));
        }
    }

    if let Some((lang, code)) = code {
        if !code.is_empty() {
            segments.push(Segment::Code { lang, code });
        }
    }

    segments
}

/// Terminal markdown renderer with syntax highlighting.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    markdown: bool,
}

impl ChatRenderer {
    /// Create a renderer. Without `markdown` replies pass through untouched.
    pub fn new(accent_color: Option<Color>, markdown: bool) -> Self {
        let mut skin = MadSkin::default_dark();

        if let Some(color) = accent_color {
            let tc = Self::crossterm_to_termimad(color);
            skin.bold.set_fg(tc);
            skin.headers[0].set_fg(tc);
            skin.headers[1].set_fg(tc);
        }

        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            markdown,
        }
    }

    /// Render a complete reply.
    ///
    /// With markdown enabled, code fences are highlighted via syntect and
    /// everything else is rendered through termimad.
    pub fn render_final(&self, markdown: &str) -> String {
        if !self.markdown {
            return markdown.to_string();
        }

        let mut output = String::new();
        for segment in split_segments(markdown) {
            match segment {
                Segment::Prose(line) => {
                    output.push_str(&self.skin.term_text(line).to_string());
                }
                Segment::Code { lang, code } => {
                    output.push_str(&self.highlight_code(&code, &lang));
                    output.push('\n');
                }
            }
        }
        output
    }

    /// Stats line shown after each reply.
    ///
    /// Format: "| {time}s . turn {n} . {window}/{max} in window"
    pub fn stats_footer(&self, response_ms: u64, turn: u32, window: usize, max_turns: usize) -> String {
        let seconds = response_ms as f64 / 1000.0;
        format!(
            "  {} {:.1}s {} turn {} {} {}/{} in window",
            console::style("|").dim(),
            console::style(seconds).dim(),
            console::style("\u{00b7}").dim(),
            console::style(turn).dim(),
            console::style("\u{00b7}").dim(),
            console::style(window).dim(),
            console::style(max_turns).dim(),
        )
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let theme = &self.theme_set.themes["base16-ocean.dark"];
        let mut h = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        output.push_str(&format!("  {}\n", console::style(format!("--- {lang} ---")).dim()));

        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }

        output
    }

    fn crossterm_to_termimad(color: Color) -> termimad::crossterm::style::Color {
        match color {
            Color::Cyan => termimad::crossterm::style::Color::Cyan,
            Color::Green => termimad::crossterm::style::Color::Green,
            Color::Yellow => termimad::crossterm::style::Color::Yellow,
            Color::Magenta => termimad::crossterm::style::Color::Magenta,
            Color::Blue => termimad::crossterm::style::Color::Blue,
            Color::Red => termimad::crossterm::style::Color::Red,
            Color::Rgb { r, g, b } => termimad::crossterm::style::Color::Rgb { r, g, b },
            _ => termimad::crossterm::style::Color::Cyan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_segments_prose_only() {
        assert_eq!(
            split_segments("one\ntwo"),
            vec![Segment::Prose("one"), Segment::Prose("two")]
        );
    }

    #[test]
    fn test_split_segments_code_block() {
        let segments = split_segments("Try this:\n```rust\nfn main() {}\n```\nDone.");
        assert_eq!(
            segments,
            vec![
                Segment::Prose("Try this:"),
                Segment::Code {
                    lang: "rust".to_string(),
                    code: "fn main() {}\n".to_string()
                },
                Segment::Prose("Done."),
            ]
        );
    }

    #[test]
    fn test_split_segments_unclosed_fence() {
        let segments = split_segments("```\nx = 1");
        assert_eq!(
            segments,
            vec![Segment::Code {
                lang: String::new(),
                code: "x = 1\n".to_string()
            }]
        );
    }

    #[test]
    fn test_default_render_is_verbatim() {
        let renderer = ChatRenderer::new(Some(Color::Cyan), false);
        let reply = "2*3*4 = 24 and my_var_name is __init__";
        let shown = renderer.render_final(reply);
        assert_eq!(console::strip_ansi_codes(&shown), reply);

        assert_eq!(renderer.render_final("**hi**\n```\ncode\n```"), "**hi**\n```\ncode\n```");
    }

    #[test]
    fn test_markdown_render_highlights_code() {
        let renderer = ChatRenderer::new(None, true);
        let shown = renderer.render_final("```rust\nlet x = 1;\n```");
        let stripped = console::strip_ansi_codes(&shown);
        assert!(stripped.contains("--- rust ---"));
        assert!(stripped.contains("let x = 1;"));
    }
}

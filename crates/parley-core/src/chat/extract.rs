//! Reply extraction from raw backend output.
//!
//! Backends that echo the prompt return `<prompt><continuation>`. The reply
//! is the continuation with the prompt removed, cut where the model starts
//! writing the next speaker's line.
//!
//! The cut is a best-effort heuristic: a role label only counts when it
//! opens a line, so `PowerUser:` or a label quoted mid-sentence is kept.

use parley_types::chat::{BOT_LABEL, USER_LABEL};
use parley_types::config::ExtractionConfig;

/// Line-start markers that end a reply.
#[derive(Debug, Clone)]
pub struct StopLabels {
    labels: Vec<String>,
    stop_at_blank_line: bool,
}

impl StopLabels {
    /// Role labels plus any configured extras. Blank extras are ignored.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let mut labels = vec![USER_LABEL.to_string(), BOT_LABEL.to_string()];
        for extra in &config.extra_stop_labels {
            let extra = extra.trim();
            if !extra.is_empty() && !labels.iter().any(|l| l == extra) {
                labels.push(extra.to_string());
            }
        }
        Self {
            labels,
            stop_at_blank_line: config.stop_at_blank_line,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn starts_line(&self, line: &str) -> bool {
        let head = line.trim_start();
        self.labels.iter().any(|label| head.starts_with(label.as_str()))
    }
}

impl Default for StopLabels {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

/// Result of extracting a reply from one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Trimmed reply text. May be empty.
    pub reply: String,
    /// Whether the raw output began with the exact prompt.
    pub prompt_echoed: bool,
}

/// Remove exactly the prompt prefix from `raw`.
///
/// When `raw` does not start with `prompt` the whole text is returned
/// unchanged and the flag is `false`.
pub fn strip_prompt<'a>(prompt: &str, raw: &'a str) -> (&'a str, bool) {
    match raw.strip_prefix(prompt) {
        Some(continuation) => (continuation, true),
        None => (raw, false),
    }
}

/// Cut `continuation` before the first line that opens with a stop label.
///
/// A `Bot:` label at the very start is the model repeating the open label
/// and is dropped instead of ending the reply.
pub fn truncate_at_role_boundary<'a>(continuation: &'a str, stops: &StopLabels) -> &'a str {
    let mut text = continuation.trim_start();
    if let Some(rest) = text.strip_prefix(BOT_LABEL) {
        text = rest.trim_start();
    }

    let mut end = text.len();
    if stops.stop_at_blank_line {
        if let Some(pos) = text.find("\n\n") {
            end = pos;
        }
    }

    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if offset >= end {
            break;
        }
        if stops.starts_line(line) {
            end = offset;
            break;
        }
        offset += line.len();
    }

    &text[..end]
}

/// Strip the prompt, cut at the first role boundary and trim.
pub fn extract_reply(prompt: &str, raw: &str, stops: &StopLabels) -> Extraction {
    let (continuation, prompt_echoed) = strip_prompt(prompt, raw);
    let reply = truncate_at_role_boundary(continuation, stops).trim().to_string();
    Extraction {
        reply,
        prompt_echoed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROMPT: &str = "User: What is 2+2?\nBot:";

    fn extract(raw: &str) -> Extraction {
        extract_reply(PROMPT, raw, &StopLabels::default())
    }

    #[test]
    fn test_cuts_before_next_user_label() {
        let raw = format!("{PROMPT}4. 2+2 equals 4.\nUser: cool");
        let extraction = extract(&raw);
        assert_eq!(extraction.reply, "4. 2+2 equals 4.");
        assert!(extraction.prompt_echoed);
    }

    #[test]
    fn test_no_label_keeps_everything() {
        let raw = format!("{PROMPT} It is four.\nDefinitely four.  ");
        assert_eq!(extract(&raw).reply, "It is four.\nDefinitely four.");
    }

    #[test]
    fn test_repeated_labels_cut_at_first() {
        let raw = format!("{PROMPT} Four.\nUser: and 3+3?\nBot: Six.\nUser: thanks");
        assert_eq!(extract(&raw).reply, "Four.");
    }

    #[test]
    fn test_hallucinated_bot_turn_is_a_boundary() {
        let raw = format!("{PROMPT} Four.\nBot: Anything else?");
        assert_eq!(extract(&raw).reply, "Four.");
    }

    #[test]
    fn test_label_inside_word_is_not_a_boundary() {
        let raw = format!("{PROMPT} Ask a PowerUser: they know.\nSuperUser: also fine");
        assert_eq!(
            extract(&raw).reply,
            "Ask a PowerUser: they know.\nSuperUser: also fine"
        );
    }

    #[test]
    fn test_label_mid_line_is_not_a_boundary() {
        let raw = format!("{PROMPT} Prefix each line with User: when quoting.");
        assert_eq!(
            extract(&raw).reply,
            "Prefix each line with User: when quoting."
        );
    }

    #[test]
    fn test_indented_label_is_a_boundary() {
        let raw = format!("{PROMPT} Four.\n   User: ok");
        assert_eq!(extract(&raw).reply, "Four.");
    }

    #[test]
    fn test_continuation_opening_with_user_label_is_empty() {
        let raw = format!("{PROMPT}\nUser: hello?");
        assert_eq!(extract(&raw).reply, "");
    }

    #[test]
    fn test_leading_repeated_bot_label_is_dropped() {
        let raw = format!("{PROMPT} Bot: Four.\nUser: ok");
        assert_eq!(extract(&raw).reply, "Four.");
    }

    #[test]
    fn test_missing_prompt_falls_back_to_whole_text() {
        let extraction = extract("Four.\nUser: cool");
        assert_eq!(extraction.reply, "Four.");
        assert!(!extraction.prompt_echoed);
    }

    #[test]
    fn test_partial_prompt_echo_is_not_stripped() {
        // Only an exact prefix counts; a truncated echo is kept as-is
        let extraction = extract("User: What is 2+2? Four.");
        assert!(!extraction.prompt_echoed);
        assert_eq!(extraction.reply, "");
    }

    #[test]
    fn test_prompt_only_output_is_empty() {
        let extraction = extract(PROMPT);
        assert!(extraction.prompt_echoed);
        assert!(extraction.reply.is_empty());
    }

    #[test]
    fn test_extra_labels_and_blank_line() {
        let stops = StopLabels::from_config(&ExtractionConfig {
            extra_stop_labels: vec!["Question:".to_string(), "  ".to_string()],
            stop_at_blank_line: true,
        });
        assert_eq!(stops.labels().len(), 3);

        let raw = format!("{PROMPT} Four.\nQuestion: what next?");
        assert_eq!(extract_reply(PROMPT, &raw, &stops).reply, "Four.");

        let raw = format!("{PROMPT} Four.\n\nExercise 1: add numbers");
        assert_eq!(extract_reply(PROMPT, &raw, &stops).reply, "Four.");
    }

    #[test]
    fn test_default_labels_cut_textbook_drift() {
        let raw = format!("{PROMPT} 2+2 equals 4.\nExercise 1: What is 3+3?\nAnswer: 6");
        assert_eq!(extract(&raw).reply, "2+2 equals 4.");

        let raw = format!("{PROMPT} Four.\nQuestion: why?");
        assert_eq!(extract(&raw).reply, "Four.");
    }

    #[test]
    fn test_default_labels_keep_numbered_lists() {
        let raw = format!("{PROMPT} Steps:\n1. add\n2. check\n- done");
        assert_eq!(extract(&raw).reply, "Steps:\n1. add\n2. check\n- done");
    }

    #[test]
    fn test_blank_line_kept_when_disabled() {
        let raw = format!("{PROMPT} Four.\n\nThat is all.");
        assert_eq!(extract(&raw).reply, "Four.\n\nThat is all.");
    }

    #[test]
    fn test_duplicate_extra_label_ignored() {
        let stops = StopLabels::from_config(&ExtractionConfig {
            extra_stop_labels: vec!["User:".to_string()],
            stop_at_blank_line: false,
        });
        assert_eq!(stops.labels().len(), 2);
    }

    #[test]
    fn test_strip_prompt_removes_exactly_once() {
        let raw = format!("{PROMPT}{PROMPT}");
        let (rest, matched) = strip_prompt(PROMPT, &raw);
        assert!(matched);
        assert_eq!(rest, PROMPT);
    }
}

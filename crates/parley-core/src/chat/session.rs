//! Per-turn conversation handling.
//!
//! `ChatSession` owns the history window and the generation backend and
//! drives one turn at a time: exit detection, prompt construction,
//! generation, reply extraction and history update. A failed generation is
//! reported to the caller and never recorded.

use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use parley_types::chat::SessionState;
use parley_types::config::ChatConfig;
use parley_types::llm::{GenerationParams, GenerationRequest, LlmError};

use crate::llm::box_provider::BoxTextGenerator;

use super::extract::{StopLabels, extract_reply};
use super::history::HistoryBuffer;

/// What happened to one line of input.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The exit command was entered; the session is done.
    Exit,
    /// The backend answered; the reply has been recorded.
    Reply(String),
    /// The backend failed; history is unchanged.
    Failed(LlmError),
}

/// A single conversation with its own history window.
pub struct ChatSession {
    id: Uuid,
    generator: BoxTextGenerator,
    history: HistoryBuffer,
    params: GenerationParams,
    stops: StopLabels,
    exit_command: String,
    fallback_reply: String,
    state: SessionState,
    turn_count: u32,
}

impl ChatSession {
    /// Create a session from the chat configuration.
    pub fn new(generator: BoxTextGenerator, config: &ChatConfig) -> Self {
        Self {
            id: Uuid::now_v7(),
            generator,
            history: HistoryBuffer::new(config.max_turns),
            params: config.generation.clone(),
            stops: StopLabels::from_config(&config.extraction),
            exit_command: config.exit_command.trim().to_string(),
            fallback_reply: config.fallback_reply.clone(),
            state: SessionState::AwaitingInput,
            turn_count: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn generator(&self) -> &BoxTextGenerator {
        &self.generator
    }

    pub fn exit_command(&self) -> &str {
        &self.exit_command
    }

    /// Completed turns over the session's lifetime, including evicted ones.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Whether `input` is the exit command (trimmed, case-insensitive).
    pub fn is_exit_command(&self, input: &str) -> bool {
        input.trim().eq_ignore_ascii_case(&self.exit_command)
    }

    /// Forget every stored turn.
    pub fn reset(&mut self) {
        debug!(session = %self.id, dropped = self.history.len(), "History cleared");
        self.history.clear();
    }

    /// Mark the session finished without further input (e.g. on EOF).
    pub fn finish(&mut self) {
        self.state = SessionState::Done;
    }

    /// Parameters for the next call. Stop sequences are dropped for backends
    /// that cannot honour them; extraction still cuts the reply.
    fn request_params(&self) -> GenerationParams {
        let mut params = self.params.clone();
        if !params.stop.is_empty() && !self.generator.capabilities().stop_sequences {
            debug!(
                backend = self.generator.name(),
                dropped = params.stop.len(),
                "Backend does not support stop sequences"
            );
            params.stop.clear();
        }
        params
    }

    /// Process one line of user input.
    ///
    /// Once the session is done every call returns `TurnOutcome::Exit`
    /// without touching the backend.
    pub async fn handle_line(&mut self, line: &str) -> TurnOutcome {
        if self.state == SessionState::Done {
            return TurnOutcome::Exit;
        }

        let input = line.trim();
        if self.is_exit_command(input) {
            self.state = SessionState::Done;
            return TurnOutcome::Exit;
        }

        self.state = SessionState::Generating;
        let request = GenerationRequest::new(self.history.format_context(input), self.request_params());

        let span = info_span!(
            "gen_ai.generate",
            gen_ai.system = self.generator.name(),
            gen_ai.request.model = self.generator.model(),
            gen_ai.request.max_tokens = request.params.max_new_tokens,
            gen_ai.request.temperature = request.params.temperature,
            session = %self.id,
        );
        let result = self.generator.generate(&request).instrument(span).await;
        self.state = SessionState::AwaitingInput;

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!(session = %self.id, error = %e, "Generation failed, turn not recorded");
                return TurnOutcome::Failed(e);
            }
        };

        let extraction = extract_reply(&request.prompt, &raw, &self.stops);
        if !extraction.prompt_echoed && self.generator.capabilities().echoes_prompt {
            warn!(
                session = %self.id,
                backend = self.generator.name(),
                "Backend output did not start with the prompt, using the whole text"
            );
        }

        let reply = if extraction.reply.is_empty() {
            debug!(session = %self.id, raw_len = raw.len(), "Empty reply after extraction");
            self.fallback_reply.clone()
        } else {
            extraction.reply
        };

        self.history.append(input, reply.clone());
        self.turn_count += 1;
        debug!(
            session = %self.id,
            turn = self.turn_count,
            window = self.history.len(),
            "Turn recorded"
        );

        TurnOutcome::Reply(reply)
    }
}

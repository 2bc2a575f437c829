//! CLI command definitions for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing. Running `parley` without a
//! subcommand starts a chat.

pub mod chat;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use parley_types::config::ChatConfig;
use parley_types::llm::BackendType;

/// Chat with a text-generation model, remembering the last few turns.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to <config dir>/parley/config.toml).
    #[arg(long, global = true, env = "PARLEY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of past turns kept in the prompt.
    #[arg(long, global = true)]
    pub max_turns: Option<usize>,

    /// Generation backend: tgi or openai_compatible.
    #[arg(long, global = true)]
    pub backend: Option<BackendType>,

    /// Base URL of the generation server.
    #[arg(long, global = true, env = "PARLEY_BASE_URL")]
    pub base_url: Option<String>,

    /// Model identifier sent to the backend.
    #[arg(long, global = true, env = "PARLEY_MODEL")]
    pub model: Option<String>,

    /// API key for the backend (overrides `api_key_env`).
    #[arg(long, global = true, env = "PARLEY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Input that ends the chat (case-insensitive).
    #[arg(long, global = true)]
    pub exit_command: Option<String>,

    /// Render replies as markdown (replies are printed verbatim otherwise).
    #[arg(long, global = true)]
    pub markdown: bool,

    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export trace spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat (the default).
    Chat,

    /// Print the effective configuration as TOML.
    Config,

    /// Check that the configured backend answers.
    Check,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Cli {
    /// Log filter derived from `--quiet` and `-v` flags.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,parley=debug",
            _ => "trace",
        }
    }

    /// Apply command-line overrides on top of file configuration.
    pub fn apply_overrides(&self, config: &mut ChatConfig) {
        if let Some(max_turns) = self.max_turns {
            config.max_turns = max_turns;
        }
        if let Some(backend) = self.backend {
            config.backend.backend_type = backend;
        }
        if let Some(base_url) = &self.base_url {
            config.backend.base_url = base_url.clone();
        }
        if let Some(model) = &self.model {
            config.backend.model = model.clone();
        }
        if let Some(exit_command) = &self.exit_command {
            config.exit_command = exit_command.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["parley"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.markdown);
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_verbosity_filters() {
        let cli = Cli::try_parse_from(["parley", "--quiet"]).unwrap();
        assert_eq!(cli.log_filter(), "error");
        let cli = Cli::try_parse_from(["parley", "-v"]).unwrap();
        assert_eq!(cli.log_filter(), "info,parley=debug");
        let cli = Cli::try_parse_from(["parley", "-vv", "chat"]).unwrap();
        assert_eq!(cli.log_filter(), "trace");
        assert!(matches!(cli.command, Some(Commands::Chat)));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let cli = Cli::try_parse_from([
            "parley",
            "--max-turns",
            "2",
            "--backend",
            "openai",
            "--base-url",
            "http://localhost:8000/v1",
            "--model",
            "phi-2",
            "--exit-command",
            "/bye",
        ])
        .unwrap();

        let mut config = ChatConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.max_turns, 2);
        assert_eq!(config.backend.backend_type, BackendType::OpenAiCompatible);
        assert_eq!(config.backend.base_url, "http://localhost:8000/v1");
        assert_eq!(config.backend.model, "phi-2");
        assert_eq!(config.exit_command, "/bye");
    }

    #[test]
    fn test_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["parley", "--backend", "ollama"]).is_err());
    }
}

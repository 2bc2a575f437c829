//! parley CLI entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, sets up tracing, loads and validates configuration,
//! builds the generation backend, then dispatches to the chosen command.

mod cli;

use clap::Parser;
use clap_complete::generate;
use secrecy::SecretString;

use parley_core::llm::box_provider::BoxTextGenerator;
use parley_infra::config::{default_config_path, load_chat_config, load_chat_config_strict, render_config};
use parley_infra::llm::{check_backend, create_generator, resolve_api_key};
use parley_observe::tracing_setup::{init_tracing, shutdown_tracing};
use parley_types::config::ChatConfig;

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_filter(), cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need configuration
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli).await?;

    match cli.command {
        None | Some(Commands::Chat) => {
            let generator = build_generator(&cli, &config)?;
            cli::chat::loop_runner::run_chat_loop(generator, &config, cli.markdown).await?;
        }

        Some(Commands::Config) => {
            print!("{}", render_config(&config)?);
        }

        Some(Commands::Check) => {
            let generator = build_generator(&cli, &config)?;
            let target = format!("{} ({})", config.backend.base_url, generator.model());
            match check_backend(&generator).await {
                Ok(()) => {
                    println!(
                        "  {} {} backend at {} is reachable",
                        console::style("✓").green(),
                        generator.name(),
                        console::style(target).cyan()
                    );
                }
                Err(e) => {
                    eprintln!(
                        "  {} {} backend at {} failed: {e}",
                        console::style("✗").red(),
                        generator.name(),
                        console::style(target).cyan()
                    );
                    anyhow::bail!("backend check failed");
                }
            }
        }

        Some(Commands::Completions { .. }) => unreachable!("handled above"),
    }

    Ok(())
}

/// Load the config file, apply CLI overrides and validate the result.
///
/// An explicitly named file must exist; the default location silently falls
/// back to built-in defaults.
async fn load_config(cli: &Cli) -> anyhow::Result<ChatConfig> {
    let mut config = match &cli.config {
        Some(path) => load_chat_config_strict(path).await?,
        None => match default_config_path() {
            Some(path) => load_chat_config(&path).await,
            None => ChatConfig::default(),
        },
    };

    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

fn build_generator(cli: &Cli, config: &ChatConfig) -> anyhow::Result<BoxTextGenerator> {
    let api_key = match &cli.api_key {
        Some(key) => Some(SecretString::from(key.clone())),
        None => resolve_api_key(&config.backend)?,
    };
    Ok(create_generator(&config.backend, api_key)?)
}

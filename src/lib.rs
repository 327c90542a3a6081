pub mod cli;
pub mod core;
pub mod providers;

use anyhow::Result;
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::debug;

use crate::cli::session::{ConversionSession, PresetAnswers};
use crate::core::config::AppConfig;
use crate::providers::ExchangeRateApiProvider;

/// Commands that need configuration and network access
#[derive(Debug, Clone)]
pub enum AppCommand {
    Convert(PresetAnswers),
    List { base: Option<String> },
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

/// Runs a command against the process's stdin and stdout.
pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_command_with_io(command, config_path, stdin.lock(), stdout.lock()).await
}

pub async fn run_command_with_io<R: BufRead, W: Write>(
    command: AppCommand,
    config_path: Option<&str>,
    input: R,
    output: W,
) -> Result<()> {
    let config = load_config(config_path)?;
    let provider = ExchangeRateApiProvider::new(
        &config.provider.base_url,
        config.provider.timeout_secs.map(Duration::from_secs),
    )?;

    match command {
        AppCommand::Convert(preset) => {
            let mut session =
                ConversionSession::new(&provider, &config.reference_currency, input, output);
            session.run(&preset).await?;
            Ok(())
        }
        AppCommand::List { base } => {
            let base = base.as_deref().unwrap_or(&config.reference_currency);
            cli::list::display_rates(&provider, base, output).await
        }
    }
}

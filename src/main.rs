use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use xurrency::cli::session::PresetAnswers;
use xurrency::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Default)]
struct ConvertArgs {
    /// Code of the base currency, skips the prompt
    #[arg(long)]
    from: Option<String>,

    /// Code of the target currency, skips the prompt
    #[arg(long)]
    to: Option<String>,

    /// Amount to convert, skips the prompt
    #[arg(long)]
    amount: Option<String>,
}

impl From<ConvertArgs> for PresetAnswers {
    fn from(args: ConvertArgs) -> PresetAnswers {
        PresetAnswers {
            base: args.from,
            target: args.to,
            amount: args.amount,
        }
    }
}

impl From<Commands> for xurrency::AppCommand {
    fn from(cmd: Commands) -> xurrency::AppCommand {
        match cmd {
            Commands::Convert(args) => xurrency::AppCommand::Convert(args.into()),
            Commands::List { base } => xurrency::AppCommand::List { base },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies (default)
    Convert(ConvertArgs),
    /// Display the latest exchange rates
    List {
        /// Currency the rates are relative to, defaults to the reference currency
        #[arg(long)]
        base: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Convert(ConvertArgs::default()));
    let result = match command {
        Commands::Setup => xurrency::cli::setup::setup(),
        cmd => xurrency::run_command(cmd.into(), cli.config_path.as_deref()).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

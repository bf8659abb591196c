use anyhow::Result;
use clap::{Parser, Subcommand};
use fxconv::cli::input::{parse_amount, parse_currency};
use fxconv::core::log::init_logging;

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount from one currency to another
    Convert {
        /// Source currency code, e.g. USD
        #[arg(value_parser = parse_currency)]
        from: String,
        /// Target currency code, e.g. EUR
        #[arg(value_parser = parse_currency)]
        to: String,
        /// Positive amount in the source currency
        #[arg(value_parser = parse_amount)]
        amount: f64,
    },
    /// Show all exchange rates for a base currency
    Rates {
        #[arg(value_parser = parse_currency)]
        base: String,
    },
    /// Prompt for conversions until end of input (default)
    Interactive,
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Convert { from, to, amount } => {
                fxconv::AppCommand::Convert { from, to, amount }
            }
            Commands::Rates { base } => fxconv::AppCommand::Rates { base },
            Commands::Interactive => fxconv::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxconv::cli::setup::setup(),
        Some(cmd) => fxconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            fxconv::run_command(fxconv::AppCommand::Interactive, cli.config_path.as_deref()).await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

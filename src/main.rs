use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xconv::core::currency::CurrencyCode;
use xconv::core::log::init_logging;

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
    /// List supported currencies
    Currencies,
    /// Convert an amount and show the 7-day trend
    Convert {
        /// Amount in the source currency
        amount: String,
        /// Source currency, defaults to the configured base
        #[arg(short, long)]
        from: Option<CurrencyCode>,
        /// Target currency, defaults to the configured target
        #[arg(short, long)]
        to: Option<CurrencyCode>,
        /// Swap source and target before converting
        #[arg(long)]
        swap: bool,
        /// Skip the historical trend
        #[arg(long)]
        no_history: bool,
    },
    /// Display current rates for a base currency
    Rates {
        #[arg(short, long)]
        from: Option<CurrencyCode>,
    },
    /// Refetch rates, bypassing the cache
    Refresh {
        #[arg(short, long)]
        from: Option<CurrencyCode>,
    },
    /// Display the 7-day rate history for a currency pair
    History {
        #[arg(short, long)]
        from: Option<CurrencyCode>,
        #[arg(short, long)]
        to: Option<CurrencyCode>,
    },
}

impl From<Commands> for xconv::AppCommand {
    fn from(cmd: Commands) -> xconv::AppCommand {
        match cmd {
            Commands::Currencies => xconv::AppCommand::Currencies,
            Commands::Convert {
                amount,
                from,
                to,
                swap,
                no_history,
            } => xconv::AppCommand::Convert {
                amount,
                from,
                to,
                swap,
                with_history: !no_history,
            },
            Commands::Rates { from } => xconv::AppCommand::Rates { from },
            Commands::Refresh { from } => xconv::AppCommand::Refresh { from },
            Commands::History { from, to } => xconv::AppCommand::History { from, to },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xconv::cli::setup::setup(),
        Some(cmd) => xconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

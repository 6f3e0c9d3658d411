pub mod cli;
pub mod core;
pub mod providers;
pub mod service;
pub mod store;

use crate::core::cache::RateCache;
use crate::core::clock::SystemClock;
use crate::core::config::AppConfig;
use crate::core::currency::CurrencyCode;
use crate::providers::ExchangeRateApiProvider;
use crate::service::{RateService, Selection};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Currencies,
    Convert {
        amount: String,
        from: Option<CurrencyCode>,
        to: Option<CurrencyCode>,
        swap: bool,
        with_history: bool,
    },
    Rates {
        from: Option<CurrencyCode>,
    },
    Refresh {
        from: Option<CurrencyCode>,
    },
    History {
        from: Option<CurrencyCode>,
        to: Option<CurrencyCode>,
    },
}

/// Wires the provider, the persistent cache and the service for `selection`.
pub fn build_service(config: &AppConfig, selection: Selection) -> Result<RateService> {
    let data_path = config.default_data_path()?;
    debug!("Using data path {}", data_path.display());

    let cache = RateCache::new(store::open_store(&data_path), Arc::new(SystemClock));
    let provider = ExchangeRateApiProvider::new(&config.providers.exchangerate.base_url)
        .context("Failed to create exchange rate provider")?;
    let provider = Arc::new(provider);
    Ok(RateService::new(provider, cache, selection))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let selection = |from: Option<CurrencyCode>, to: Option<CurrencyCode>| Selection {
        base: from.unwrap_or(config.base_currency),
        target: to.unwrap_or(config.target_currency),
    };

    match command {
        AppCommand::Currencies => cli::currencies::run(),
        AppCommand::Convert {
            amount,
            from,
            to,
            swap,
            with_history,
        } => {
            let service = build_service(&config, selection(from, to))?;
            cli::convert::run(&service, &amount, swap, with_history).await
        }
        AppCommand::Rates { from } => {
            let service = build_service(&config, selection(from, None))?;
            cli::rates::run(&service, false).await
        }
        AppCommand::Refresh { from } => {
            let service = build_service(&config, selection(from, None))?;
            cli::rates::run(&service, true).await
        }
        AppCommand::History { from, to } => {
            let service = build_service(&config, selection(from, to))?;
            cli::history::run(&service).await
        }
    }
}

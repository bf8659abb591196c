pub mod cli;
pub mod converter;
pub mod core;
pub mod providers;
pub mod store;

use crate::converter::Converter;
use crate::core::config::AppConfig;
use crate::core::credentials::EnvFileCredentials;
use crate::providers::{CachingRateFetcher, ExchangeRateApiProvider};
use crate::store::RateCache;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Convert { from: String, to: String, amount: f64 },
    Rates { base: String },
    Interactive,
}

/// Wires the upstream provider, the shared rate cache and the credential
/// provider described by `config`.
pub fn build_converter(config: &AppConfig) -> Result<Converter<ExchangeRateApiProvider>> {
    let provider =
        ExchangeRateApiProvider::new(&config.provider.base_url, config.provider.timeout())
            .context("Failed to create HTTP client")?;
    let rate_cache = Arc::new(RateCache::new());
    let fetcher = CachingRateFetcher::new(provider, rate_cache);
    let credentials = EnvFileCredentials::new(
        &config.credentials.env_file,
        &config.credentials.api_key_var,
    );

    Ok(Converter::new(fetcher, Arc::new(credentials)))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let converter = build_converter(&config)?;

    match command {
        AppCommand::Convert { from, to, amount } => {
            cli::convert::run(&converter, &from, &to, amount).await
        }
        AppCommand::Rates { base } => cli::rates::run(&converter, &base).await,
        AppCommand::Interactive => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            cli::interactive::run(&converter, input, std::io::stdout()).await
        }
    }
}

/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

use anyhow::{bail, Context, Result};
use cmc_core::config::env_parse;
use cmc_core::{Config as CoreConfig, Symbol};
use std::env;
use std::time::Duration;

const DEFAULT_TICKER_INTERVAL_SECS: u64 = 60;
const DEFAULT_ID_MAP_LIMIT: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
  pub api_config: CoreConfig,
  pub ticker_interval: Duration,
  pub id_map_limit: u32,
  pub convert: String,
  /// Optional watchlist; empty means "top `id_map_limit` by rank"
  pub symbols: Vec<Symbol>,
  pub use_db: bool,
  pub database_url: Option<String>,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    let api_config = CoreConfig::from_env().context("Failed to load CoinMarketCap API configuration")?;

    let ticker_secs: u64 = env_parse("CMC_TICKER_INTERVAL_SECS", DEFAULT_TICKER_INTERVAL_SECS)?;
    if ticker_secs == 0 {
      bail!("CMC_TICKER_INTERVAL_SECS must be greater than zero");
    }

    let id_map_limit: u32 = env_parse("CMC_ID_MAP_LIMIT", DEFAULT_ID_MAP_LIMIT)?;
    if id_map_limit == 0 {
      bail!("CMC_ID_MAP_LIMIT must be greater than zero");
    }

    let convert = env::var("CMC_CONVERT")
      .map(|c| c.trim().to_uppercase())
      .ok()
      .filter(|c| !c.is_empty())
      .unwrap_or_else(|| cmc_core::DEFAULT_CONVERT.to_string());

    let symbols = parse_symbols(&env::var("CMC_SYMBOLS").unwrap_or_default())?;

    let use_db = parse_flag(&env::var("USE_DB").unwrap_or_default())
      .with_context(|| "USE_DB must be true or false")?;

    let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());
    if use_db && database_url.is_none() {
      bail!("DATABASE_URL environment variable not set but USE_DB=true");
    }

    Ok(Self {
      api_config,
      ticker_interval: Duration::from_secs(ticker_secs),
      id_map_limit,
      convert,
      symbols,
      use_db,
      database_url,
    })
  }

  /// Upper bound on a whole quote fetch or resolver tier, covering every
  /// transport attempt and the backoff between them
  pub fn fetch_timeout(&self) -> Duration {
    self.api_config.request_budget()
  }

  /// Upper bound on startup resolution: one fetch budget per tier
  pub fn startup_timeout(&self) -> Duration {
    self.fetch_timeout().saturating_mul(3)
  }
}

/// Comma separated watchlist. Blank items are ignored.
pub fn parse_symbols(raw: &str) -> Result<Vec<Symbol>> {
  let mut symbols = Vec::new();
  for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
    let symbol = Symbol::new(item).with_context(|| format!("Invalid symbol in CMC_SYMBOLS: {}", item))?;
    if !symbols.contains(&symbol) {
      symbols.push(symbol);
    }
  }
  Ok(symbols)
}

fn parse_flag(raw: &str) -> Result<bool> {
  match raw.trim().to_ascii_lowercase().as_str() {
    "" | "false" | "0" | "no" => Ok(false),
    "true" | "1" | "yes" => Ok(true),
    other => bail!("unrecognised flag value {:?}", other),
  }
}

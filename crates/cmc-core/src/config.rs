/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Configuration management for the CoinMarketCap client

use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

/// API configuration for the CoinMarketCap client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
  /// CoinMarketCap Pro API key
  pub api_key: String,

  /// API rate limit (requests per minute)
  pub rate_limit: u32,

  /// Request timeout in seconds
  pub timeout_secs: u64,

  /// Maximum retries for transient failures
  pub max_retries: u32,

  /// Base URL for the CoinMarketCap API
  pub base_url: String,

  /// Full URL of the ID map endpoint
  pub id_map_url: String,

  /// Full URL of the latest quotes endpoint
  pub quotes_url: String,
}

impl Config {
  /// Load configuration from environment variables
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let api_key = env::var("CMC_API_KEY")
      .map_err(|_| Error::ApiKey("CMC_API_KEY not set".to_string()))?;
    if api_key.trim().is_empty() {
      return Err(Error::ApiKey("CMC_API_KEY is empty".to_string()));
    }

    let rate_limit = env_parse("CMC_RATE_LIMIT", crate::DEFAULT_RATE_LIMIT)?;
    let timeout_secs = env_parse("CMC_TIMEOUT_SECS", crate::DEFAULT_TIMEOUT_SECS)?;
    let max_retries = env_parse("CMC_MAX_RETRIES", crate::DEFAULT_MAX_RETRIES)?;

    let base_url = env::var("CMC_BASE_URL")
      .unwrap_or_else(|_| crate::CMC_BASE_URL.to_string())
      .trim_end_matches('/')
      .to_string();
    let id_map_url =
      env::var("CMC_ID_MAP_URL").unwrap_or_else(|_| format!("{}{}", base_url, crate::ID_MAP_PATH));
    let quotes_url = env::var("CMC_QUOTES_URL")
      .unwrap_or_else(|_| format!("{}{}", base_url, crate::QUOTES_LATEST_PATH));

    let config =
      Config { api_key, rate_limit, timeout_secs, max_retries, base_url, id_map_url, quotes_url };
    config.validate()?;
    Ok(config)
  }

  /// Create a config with default values (for testing)
  pub fn default_with_key(api_key: String) -> Self {
    Self::with_base_url(api_key, crate::CMC_BASE_URL)
  }

  /// Create a config whose endpoints hang off `base_url` (mock servers, sandbox)
  pub fn with_base_url(api_key: String, base_url: &str) -> Self {
    let base_url = base_url.trim_end_matches('/').to_string();
    Config {
      api_key,
      rate_limit: crate::DEFAULT_RATE_LIMIT,
      timeout_secs: crate::DEFAULT_TIMEOUT_SECS,
      max_retries: crate::DEFAULT_MAX_RETRIES,
      id_map_url: format!("{}{}", base_url, crate::ID_MAP_PATH),
      quotes_url: format!("{}{}", base_url, crate::QUOTES_LATEST_PATH),
      base_url,
    }
  }

  /// Request timeout as a `Duration`
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }

  /// Longest a single logical request can take through the transport,
  /// retries and backoff included. Outer timeouts should use this.
  pub fn request_budget(&self) -> Duration {
    request_budget(self.timeout(), self.max_retries, self.rate_limit)
  }

  /// Check that the endpoint URLs parse and the limits are usable
  pub fn validate(&self) -> Result<()> {
    for (name, value) in
      [("CMC_BASE_URL", &self.base_url), ("CMC_ID_MAP_URL", &self.id_map_url), ("CMC_QUOTES_URL", &self.quotes_url)]
    {
      Url::parse(value).map_err(|e| Error::Config(format!("Invalid {}: {}", name, e)))?;
    }
    if self.timeout_secs == 0 {
      return Err(Error::Config("CMC_TIMEOUT_SECS must be greater than zero".to_string()));
    }
    if self.rate_limit == 0 {
      return Err(Error::Config("CMC_RATE_LIMIT must be greater than zero".to_string()));
    }
    if self.max_retries > crate::MAX_RETRIES_LIMIT {
      return Err(Error::Config(format!(
        "CMC_MAX_RETRIES must be at most {}",
        crate::MAX_RETRIES_LIMIT
      )));
    }
    Ok(())
  }
}

/// Backoff slept before retry number `attempt` (1-based)
pub fn retry_delay(attempt: u32) -> Duration {
  let factor = 2_u64.saturating_pow(attempt);
  Duration::from_millis(crate::RETRY_BASE_DELAY_MS.saturating_mul(factor))
}

/// Worst case for one request: every attempt hits `timeout`, every backoff is
/// slept, and the rate limiter holds the first attempt for one replenish
/// period (`60s / rate_limit`).
pub fn request_budget(timeout: Duration, max_retries: u32, rate_limit: u32) -> Duration {
  let attempts = max_retries.saturating_add(1);
  let backoff = (1..=max_retries)
    .fold(Duration::ZERO, |total, attempt| total.saturating_add(retry_delay(attempt)));
  let limiter_wait = Duration::from_secs(60) / rate_limit.max(1);
  timeout.saturating_mul(attempts).saturating_add(backoff).saturating_add(limiter_wait)
}

/// Read and parse an environment variable, falling back to `default` when unset
pub fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
  match env::var(key) {
    Ok(raw) => raw.trim().parse().map_err(|_| Error::Config(format!("Invalid {}", key))),
    Err(_) => Ok(default),
  }
}

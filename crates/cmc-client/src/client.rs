/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

use crate::endpoints::{SharedRateLimiter, id_map::IdMapEndpoints, quotes::QuotesEndpoints};
use crate::transport::Transport;
use cmc_core::{Config, Result};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// CoinMarketCap API client
///
/// Owns one transport and one rate limiter; the endpoint handles it hands out
/// share both, so every request made through a client counts against the
/// same per-minute quota.
///
/// # Examples
///
/// ```ignore
/// use cmc_client::CmcClient;
/// use cmc_core::Config;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CmcClient::new(Config::from_env()?)?;
///
///     let top = client.id_map().top_coins(10).await?;
///     let ids: Vec<_> = top.iter().map(|entry| entry.id).collect();
///     let quotes = client.quotes().latest(&ids, "USD", &[]).await?;
///     println!("{} quotes", quotes.data.len());
///     Ok(())
/// }
/// ```
pub struct CmcClient {
  rate_limiter: SharedRateLimiter,
  transport: Arc<Transport>,
  id_map_url: String,
  quotes_url: String,
}

impl CmcClient {
  /// Create a new client
  ///
  /// # Errors
  ///
  /// Returns an error if the HTTP client cannot be created.
  pub fn new(config: Config) -> Result<Self> {
    let rate_limit_value = NonZeroU32::new(config.rate_limit)
      .or_else(|| NonZeroU32::new(cmc_core::DEFAULT_RATE_LIMIT))
      .unwrap_or(NonZeroU32::MIN);
    let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(rate_limit_value)));

    Self::with_rate_limiter(config, rate_limiter)
  }

  /// Create a new client with custom rate limiting
  pub fn with_rate_limiter(config: Config, rate_limiter: SharedRateLimiter) -> Result<Self> {
    let transport = Arc::new(Transport::new(&config)?);
    Ok(Self { rate_limiter, transport, id_map_url: config.id_map_url, quotes_url: config.quotes_url })
  }

  /// Symbol to id resolution endpoint
  pub fn id_map(&self) -> IdMapEndpoints {
    IdMapEndpoints::new(self.transport.clone(), self.rate_limiter.clone(), self.id_map_url.clone())
  }

  /// Latest quotes endpoint
  pub fn quotes(&self) -> QuotesEndpoints {
    QuotesEndpoints::new(self.transport.clone(), self.rate_limiter.clone(), self.quotes_url.clone())
  }

  /// Timeout applied to every request
  pub fn timeout(&self) -> Duration {
    self.transport.timeout()
  }
}

impl std::fmt::Debug for CmcClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CmcClient")
      .field("transport", &self.transport)
      .field("rate_limiter", &"RateLimiter")
      .field("id_map_url", &self.id_map_url)
      .field("quotes_url", &self.quotes_url)
      .finish()
  }
}

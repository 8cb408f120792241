/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Symbol to provider id resolution through `/v1/cryptocurrency/map`

use super::{EndpointBase, SharedRateLimiter, impl_endpoint_base};
use crate::transport::Transport;
use cmc_core::{Result, Symbol, types::join_csv};
use cmc_models::{IdMapResponse, MapSort, ResolutionEntry};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Query parameters for the map endpoint
///
/// When `symbols` is non-empty the request filters by symbol and the
/// provider ignores `start`/`limit`, so they are left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdMapQuery {
  pub start: u32,
  pub limit: u32,
  pub sort: MapSort,
  pub symbols: Vec<Symbol>,
}

impl Default for IdMapQuery {
  fn default() -> Self {
    Self { start: 1, limit: 10, sort: MapSort::CmcRank, symbols: Vec::new() }
  }
}

impl IdMapQuery {
  /// Top `limit` assets ordered by market-cap rank
  pub fn top(limit: u32) -> Self {
    Self { limit, ..Default::default() }
  }

  /// Assets matching any of the given symbols
  pub fn symbols(symbols: &[Symbol]) -> Self {
    Self { symbols: symbols.to_vec(), ..Default::default() }
  }

  pub fn params(&self) -> Vec<(&'static str, String)> {
    if self.symbols.is_empty() {
      vec![
        ("start", self.start.to_string()),
        ("limit", self.limit.to_string()),
        ("sort", self.sort.to_string()),
      ]
    } else {
      vec![("symbol", join_csv(&self.symbols)), ("sort", self.sort.to_string())]
    }
  }
}

/// ID map endpoint
pub struct IdMapEndpoints {
  transport: Arc<Transport>,
  rate_limiter: SharedRateLimiter,
  url: String,
}

impl_endpoint_base!(IdMapEndpoints);

impl IdMapEndpoints {
  /// Create a new ID map endpoint instance
  pub fn new(transport: Arc<Transport>, rate_limiter: SharedRateLimiter, url: String) -> Self {
    Self { transport, rate_limiter, url }
  }

  /// Run a raw map query and convert every asset into a `ResolutionEntry`
  ///
  /// Entries whose symbol cannot be normalised are skipped with a warning.
  #[instrument(skip(self), fields(url = %self.url))]
  pub async fn map(&self, query: &IdMapQuery) -> Result<Vec<ResolutionEntry>> {
    let response: IdMapResponse = self.fetch(&query.params()).await?;
    debug!("Map endpoint returned {} assets", response.data.len());

    let entries = response
      .data
      .into_iter()
      .filter_map(|raw| {
        let id = raw.id;
        ResolutionEntry::try_from(raw)
          .map_err(|e| warn!("Skipping map entry {}: {}", id, e))
          .ok()
      })
      .collect();

    Ok(entries)
  }

  /// Top-N assets by `cmc_rank`
  pub async fn top_coins(&self, limit: u32) -> Result<Vec<ResolutionEntry>> {
    self.map(&IdMapQuery::top(limit)).await
  }

  /// Every asset listed under one of `symbols`
  ///
  /// Several assets can share a ticker, so the result may hold more entries
  /// than symbols requested.
  pub async fn by_symbols(&self, symbols: &[Symbol]) -> Result<Vec<ResolutionEntry>> {
    self.map(&IdMapQuery::symbols(symbols)).await
  }
}

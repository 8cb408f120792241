/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Canonical records passed between the resolver, the collector and storage.

use chrono::{DateTime, Utc};
use cmc_core::{ProviderId, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One resolved `symbol -> id` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionEntry {
  pub symbol: Symbol,
  pub id: ProviderId,
  pub name: Option<String>,
  pub slug: Option<String>,
  /// CoinMarketCap rank at resolution time
  pub rank: Option<u32>,
}

impl ResolutionEntry {
  pub fn new(symbol: Symbol, id: ProviderId) -> Self {
    Self { symbol, id, name: None, slug: None, rank: None }
  }

  pub fn with_name(mut self, name: &str, slug: &str) -> Self {
    self.name = Some(name.to_string());
    self.slug = Some(slug.to_string());
    self
  }
}

/// Market data for one asset in one reporting currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PriceQuote {
  pub price: Option<f64>,
  pub volume_24h: Option<f64>,
  pub volume_24h_reported: Option<f64>,
  pub market_cap: Option<f64>,
  pub percent_change_1h: Option<f64>,
  pub percent_change_24h: Option<f64>,
  pub percent_change_7d: Option<f64>,
  pub last_updated: Option<DateTime<Utc>>,
}

/// Snapshot of one asset as returned by a single collection cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
  pub id: ProviderId,
  pub symbol: Symbol,
  pub name: String,
  pub slug: String,
  pub circulating_supply: Option<f64>,
  pub total_supply: Option<f64>,
  pub max_supply: Option<f64>,
  pub last_updated: Option<DateTime<Utc>>,
  /// Keyed by currency code, e.g. `"USD"`
  pub quotes: BTreeMap<String, PriceQuote>,
}

impl QuoteRecord {
  /// Quote in `currency`, if the response carried one
  pub fn quote(&self, currency: &str) -> Option<&PriceQuote> {
    self.quotes.get(currency)
  }

  /// Price in `currency`; `None` both when the currency is missing and when
  /// the upstream price was `null`
  pub fn price(&self, currency: &str) -> Option<f64> {
    self.quote(currency).and_then(|q| q.price)
  }
}

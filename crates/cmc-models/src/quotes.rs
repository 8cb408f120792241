/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Models for `/v2/cryptocurrency/quotes/latest`
//!
//! The endpoint returns `data` as an object keyed by the requested ids. All
//! numeric fields are nullable upstream, so all of them are `Option<f64>`.

use crate::coin::{PriceQuote, QuoteRecord};
use crate::common::ApiEnvelope;
use chrono::{DateTime, Utc};
use cmc_core::{Error, ProviderId, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Auxiliary fields that can be requested on top of the default quote payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxField {
  NumMarketPairs,
  CmcRank,
  DateAdded,
  Tags,
  Platform,
  MaxSupply,
  CirculatingSupply,
  TotalSupply,
  MarketCapByTotalSupply,
  Volume24hReported,
  Volume7d,
  Volume7dReported,
  Volume30d,
  Volume30dReported,
  IsActive,
  IsFiat,
}

impl fmt::Display for AuxField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      AuxField::NumMarketPairs => "num_market_pairs",
      AuxField::CmcRank => "cmc_rank",
      AuxField::DateAdded => "date_added",
      AuxField::Tags => "tags",
      AuxField::Platform => "platform",
      AuxField::MaxSupply => "max_supply",
      AuxField::CirculatingSupply => "circulating_supply",
      AuxField::TotalSupply => "total_supply",
      AuxField::MarketCapByTotalSupply => "market_cap_by_total_supply",
      AuxField::Volume24hReported => "volume_24h_reported",
      AuxField::Volume7d => "volume_7d",
      AuxField::Volume7dReported => "volume_7d_reported",
      AuxField::Volume30d => "volume_30d",
      AuxField::Volume30dReported => "volume_30d_reported",
      AuxField::IsActive => "is_active",
      AuxField::IsFiat => "is_fiat",
    };
    f.write_str(name)
  }
}

/// Aux fields the collector asks for. Anything not listed is left out of the
/// response, which keeps the payload and the credit cost down.
pub const COLLECTOR_AUX_FIELDS: [AuxField; 4] = [
  AuxField::CirculatingSupply,
  AuxField::TotalSupply,
  AuxField::MaxSupply,
  AuxField::Volume24hReported,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmcCoinQuote {
  pub id: u64,
  pub name: String,
  pub symbol: String,
  pub slug: String,
  pub num_market_pairs: Option<u32>,
  pub date_added: Option<String>,
  pub max_supply: Option<f64>,
  pub circulating_supply: Option<f64>,
  pub total_supply: Option<f64>,
  pub infinite_supply: Option<bool>,
  pub is_active: Option<u8>,
  pub cmc_rank: Option<u32>,
  pub last_updated: Option<DateTime<Utc>>,
  #[serde(default)]
  pub quote: HashMap<String, CmcQuote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmcQuote {
  pub price: Option<f64>,
  pub volume_24h: Option<f64>,
  pub volume_24h_reported: Option<f64>,
  pub volume_change_24h: Option<f64>,
  pub percent_change_1h: Option<f64>,
  pub percent_change_24h: Option<f64>,
  pub percent_change_7d: Option<f64>,
  pub percent_change_30d: Option<f64>,
  pub market_cap: Option<f64>,
  pub market_cap_dominance: Option<f64>,
  pub fully_diluted_market_cap: Option<f64>,
  pub last_updated: Option<DateTime<Utc>>,
}

pub type QuotesResponse = ApiEnvelope<HashMap<String, CmcCoinQuote>>;

impl From<CmcQuote> for PriceQuote {
  fn from(q: CmcQuote) -> Self {
    PriceQuote {
      price: q.price,
      volume_24h: q.volume_24h,
      volume_24h_reported: q.volume_24h_reported,
      market_cap: q.market_cap,
      percent_change_1h: q.percent_change_1h,
      percent_change_24h: q.percent_change_24h,
      percent_change_7d: q.percent_change_7d,
      last_updated: q.last_updated,
    }
  }
}

impl TryFrom<CmcCoinQuote> for QuoteRecord {
  type Error = Error;

  fn try_from(coin: CmcCoinQuote) -> Result<Self, Self::Error> {
    let quotes: BTreeMap<String, PriceQuote> =
      coin.quote.into_iter().map(|(currency, q)| (currency.to_uppercase(), q.into())).collect();

    Ok(QuoteRecord {
      id: ProviderId(coin.id),
      symbol: Symbol::new(&coin.symbol)?,
      name: coin.name,
      slug: coin.slug,
      circulating_supply: coin.circulating_supply,
      total_supply: coin.total_supply,
      max_supply: coin.max_supply,
      last_updated: coin.last_updated,
      quotes,
    })
  }
}

/// Turn a decoded response into canonical records ordered by id.
///
/// Fails when a `data` key disagrees with the id inside its object.
pub fn into_records(data: HashMap<String, CmcCoinQuote>) -> Result<Vec<QuoteRecord>, Error> {
  let mut records = Vec::with_capacity(data.len());
  for (key, coin) in data {
    let key_id: ProviderId = key.parse()?;
    if key_id.value() != coin.id {
      return Err(Error::Parse(format!("data key {} holds quote for id {}", key, coin.id)));
    }
    records.push(QuoteRecord::try_from(coin)?);
  }
  records.sort_by_key(|record| record.id);
  Ok(records)
}

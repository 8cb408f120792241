/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

use super::{id_from_db, id_to_db};
use crate::repository::{RepositoryError, RepositoryResult};
use crate::schema::{coin_quote_prices, coin_quotes};
use chrono::{DateTime, Utc};
use cmc_core::Symbol;
use cmc_models::{PriceQuote, QuoteRecord};
use diesel::prelude::*;
use std::collections::BTreeMap;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = coin_quotes)]
#[diesel(primary_key(cmc_id))]
pub struct CoinQuoteRow {
  pub cmc_id: i64,
  pub symbol: String,
  pub name: String,
  pub slug: String,
  pub circulating_supply: Option<f64>,
  pub total_supply: Option<f64>,
  pub max_supply: Option<f64>,
  pub last_updated: Option<DateTime<Utc>>,
  pub collected_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = coin_quotes)]
pub struct NewCoinQuote {
  pub cmc_id: i64,
  pub symbol: String,
  pub name: String,
  pub slug: String,
  pub circulating_supply: Option<f64>,
  pub total_supply: Option<f64>,
  pub max_supply: Option<f64>,
  pub last_updated: Option<DateTime<Utc>>,
  pub collected_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(table_name = coin_quote_prices)]
#[diesel(primary_key(cmc_id, currency))]
#[diesel(belongs_to(CoinQuoteRow, foreign_key = cmc_id))]
pub struct CoinQuotePriceRow {
  pub cmc_id: i64,
  pub currency: String,
  pub price: Option<f64>,
  pub volume_24h: Option<f64>,
  pub volume_24h_reported: Option<f64>,
  pub market_cap: Option<f64>,
  pub percent_change_1h: Option<f64>,
  pub percent_change_24h: Option<f64>,
  pub percent_change_7d: Option<f64>,
  pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = coin_quote_prices)]
pub struct NewCoinQuotePrice {
  pub cmc_id: i64,
  pub currency: String,
  pub price: Option<f64>,
  pub volume_24h: Option<f64>,
  pub volume_24h_reported: Option<f64>,
  pub market_cap: Option<f64>,
  pub percent_change_1h: Option<f64>,
  pub percent_change_24h: Option<f64>,
  pub percent_change_7d: Option<f64>,
  pub last_updated: Option<DateTime<Utc>>,
}

/// Split a record into its coin row and one price row per currency
pub fn record_to_rows(
  record: &QuoteRecord,
  collected_at: DateTime<Utc>,
) -> RepositoryResult<(NewCoinQuote, Vec<NewCoinQuotePrice>)> {
  let cmc_id = id_to_db(record.id)?;

  let coin = NewCoinQuote {
    cmc_id,
    symbol: record.symbol.to_string(),
    name: record.name.clone(),
    slug: record.slug.clone(),
    circulating_supply: record.circulating_supply,
    total_supply: record.total_supply,
    max_supply: record.max_supply,
    last_updated: record.last_updated,
    collected_at,
  };

  let prices = record
    .quotes
    .iter()
    .map(|(currency, q)| NewCoinQuotePrice {
      cmc_id,
      currency: currency.clone(),
      price: q.price,
      volume_24h: q.volume_24h,
      volume_24h_reported: q.volume_24h_reported,
      market_cap: q.market_cap,
      percent_change_1h: q.percent_change_1h,
      percent_change_24h: q.percent_change_24h,
      percent_change_7d: q.percent_change_7d,
      last_updated: q.last_updated,
    })
    .collect();

  Ok((coin, prices))
}

/// Reassemble a record from its stored rows
pub fn rows_to_record(coin: CoinQuoteRow, prices: Vec<CoinQuotePriceRow>) -> RepositoryResult<QuoteRecord> {
  let quotes: BTreeMap<String, PriceQuote> = prices
    .into_iter()
    .map(|p| {
      (
        p.currency,
        PriceQuote {
          price: p.price,
          volume_24h: p.volume_24h,
          volume_24h_reported: p.volume_24h_reported,
          market_cap: p.market_cap,
          percent_change_1h: p.percent_change_1h,
          percent_change_24h: p.percent_change_24h,
          percent_change_7d: p.percent_change_7d,
          last_updated: p.last_updated,
        },
      )
    })
    .collect();

  Ok(QuoteRecord {
    id: id_from_db(coin.cmc_id)?,
    symbol: Symbol::new(&coin.symbol).map_err(|e| RepositoryError::Conversion(e.to_string()))?,
    name: coin.name,
    slug: coin.slug,
    circulating_supply: coin.circulating_supply,
    total_supply: coin.total_supply,
    max_supply: coin.max_supply,
    last_updated: coin.last_updated,
    quotes,
  })
}

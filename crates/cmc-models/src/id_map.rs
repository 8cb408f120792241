/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Models for `/v1/cryptocurrency/map`

use crate::coin::ResolutionEntry;
use crate::common::ApiEnvelope;
use cmc_core::{ProviderId, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort keys accepted by the map endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapSort {
  #[default]
  CmcRank,
  Id,
}

impl fmt::Display for MapSort {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MapSort::CmcRank => write!(f, "cmc_rank"),
      MapSort::Id => write!(f, "id"),
    }
  }
}

/// One asset in the map response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmcIdMapEntry {
  pub id: u64,
  #[serde(default)]
  pub rank: Option<u32>,
  pub name: String,
  pub symbol: String,
  pub slug: String,
  #[serde(default)]
  pub is_active: Option<u8>,
  #[serde(default)]
  pub first_historical_data: Option<String>,
  #[serde(default)]
  pub last_historical_data: Option<String>,
  #[serde(default)]
  pub platform: Option<CmcPlatform>,
}

/// Parent chain of a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmcPlatform {
  pub id: u64,
  pub name: String,
  pub symbol: String,
  pub slug: String,
  #[serde(default)]
  pub token_address: Option<String>,
}

pub type IdMapResponse = ApiEnvelope<Vec<CmcIdMapEntry>>;

impl TryFrom<CmcIdMapEntry> for ResolutionEntry {
  type Error = cmc_core::Error;

  fn try_from(entry: CmcIdMapEntry) -> Result<Self, Self::Error> {
    Ok(ResolutionEntry {
      symbol: Symbol::new(&entry.symbol)?,
      id: ProviderId(entry.id),
      name: Some(entry.name),
      slug: Some(entry.slug),
      rank: entry.rank,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const MAP_JSON: &str = r#"{
    "status": {
      "timestamp": "2025-08-14T10:00:00.000Z",
      "error_code": 0,
      "error_message": null,
      "elapsed": 7,
      "credit_count": 1,
      "notice": null
    },
    "data": [
      {
        "id": 1,
        "rank": 1,
        "name": "Bitcoin",
        "symbol": "BTC",
        "slug": "bitcoin",
        "is_active": 1,
        "first_historical_data": "2013-04-28T18:47:21.000Z",
        "last_historical_data": "2025-08-14T09:59:00.000Z",
        "platform": null
      },
      {
        "id": 3408,
        "rank": 7,
        "name": "USDC",
        "symbol": "USDC",
        "slug": "usd-coin",
        "is_active": 1,
        "platform": {
          "id": 1027,
          "name": "Ethereum",
          "symbol": "ETH",
          "slug": "ethereum",
          "token_address": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
        }
      }
    ]
  }"#;

  #[test]
  fn test_map_response_parsing() {
    let response: IdMapResponse = serde_json::from_str(MAP_JSON).unwrap();
    assert!(response.status.is_ok());
    assert_eq!(response.data.len(), 2);
    assert!(response.data[0].platform.is_none());
    assert_eq!(response.data[1].platform.as_ref().unwrap().symbol, "ETH");
  }

  #[test]
  fn test_entry_conversion() {
    let response: IdMapResponse = serde_json::from_str(MAP_JSON).unwrap();
    let entries: Vec<ResolutionEntry> =
      response.data.into_iter().map(ResolutionEntry::try_from).collect::<Result<_, _>>().unwrap();

    assert_eq!(entries[0].symbol.as_str(), "BTC");
    assert_eq!(entries[0].id, ProviderId(1));
    assert_eq!(entries[1].slug.as_deref(), Some("usd-coin"));
    assert_eq!(entries[1].rank, Some(7));
  }

  #[test]
  fn test_sort_display() {
    assert_eq!(MapSort::CmcRank.to_string(), "cmc_rank");
    assert_eq!(MapSort::Id.to_string(), "id");
  }
}

/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Identifier types used as keys throughout the pipeline.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticker symbol such as `BTC`.
///
/// Always stored trimmed and upper-cased so that lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
  pub fn new(raw: &str) -> Result<Self> {
    let normalized = raw.trim().to_uppercase();
    if normalized.is_empty() || normalized.contains(',') {
      return Err(Error::InvalidSymbol(raw.to_string()));
    }
    Ok(Self(normalized))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl FromStr for Symbol {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Symbol::new(s)
  }
}

impl<'de> Deserialize<'de> for Symbol {
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw = String::deserialize(deserializer)?;
    Symbol::new(&raw).map_err(serde::de::Error::custom)
  }
}

/// CoinMarketCap's numeric asset identifier (e.g. Ethereum is `1027`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(pub u64);

impl ProviderId {
  pub fn value(self) -> u64 {
    self.0
  }
}

impl fmt::Display for ProviderId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl FromStr for ProviderId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    s.trim()
      .parse::<u64>()
      .map(ProviderId)
      .map_err(|_| Error::Parse(format!("invalid provider id: {:?}", s)))
  }
}

impl From<u64> for ProviderId {
  fn from(id: u64) -> Self {
    ProviderId(id)
  }
}

/// Join a list of values into the comma separated form the API expects.
pub fn join_csv<T: fmt::Display>(items: &[T]) -> String {
  items.iter().map(|item| item.to_string()).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_symbol_is_normalized() {
    let symbol = Symbol::new("  eth ").unwrap();
    assert_eq!(symbol.as_str(), "ETH");
    assert_eq!(symbol, "Eth".parse::<Symbol>().unwrap());
  }

  #[test]
  fn test_symbol_rejects_empty_and_lists() {
    assert!(Symbol::new("   ").is_err());
    assert!(Symbol::new("BTC,ETH").is_err());
  }

  #[test]
  fn test_symbol_deserialize_normalizes() {
    let symbol: Symbol = serde_json::from_str("\"sol\"").unwrap();
    assert_eq!(symbol.to_string(), "SOL");
  }

  #[test]
  fn test_provider_id_parse_and_display() {
    let id: ProviderId = "1027".parse().unwrap();
    assert_eq!(id, ProviderId(1027));
    assert_eq!(id.to_string(), "1027");
    assert!("abc".parse::<ProviderId>().is_err());
  }

  #[test]
  fn test_join_csv() {
    assert_eq!(join_csv(&[ProviderId(1), ProviderId(1027)]), "1,1027");
    assert_eq!(join_csv::<ProviderId>(&[]), "");
  }
}

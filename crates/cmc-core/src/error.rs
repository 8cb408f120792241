/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

use thiserror::Error;

/// The main error type for cmc-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// API key missing or rejected
  #[error("API key error: {0}")]
  ApiKey(String),

  /// Serialization/Deserialization error
  #[error("Serialization error: {0}")]
  Serde(#[from] serde_json::Error),

  /// API rate limit or credit limit exceeded
  #[error("Rate limit exceeded: {0}")]
  RateLimit(String),

  /// HTTP transport error
  #[error("HTTP error: {0}")]
  Http(String),

  /// Non-success HTTP status
  #[error("HTTP status {0}")]
  Status(u16),

  /// Request did not complete within the configured timeout
  #[error("Request timed out after {0} seconds")]
  Timeout(u64),

  /// Error reported in the CoinMarketCap status block
  #[error("API error {code}: {message}")]
  Api { code: i64, message: String },

  /// Response body could not be decoded
  #[error("Parse error: {0}")]
  Parse(String),

  /// Symbol failed validation
  #[error("Invalid symbol: {0:?}")]
  InvalidSymbol(String),
}

impl Error {
  /// Whether the failure is worth another attempt at the transport level.
  pub fn is_transient(&self) -> bool {
    match self {
      Error::Http(_) | Error::Timeout(_) => true,
      Error::Status(status) => *status >= 500,
      _ => false,
    }
  }
}

/// Result type alias for cmc-* crates
pub type Result<T> = std::result::Result<T, Error>;

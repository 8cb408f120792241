/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Error types for resolution and quote collection.

use thiserror::Error;

/// Errors surfaced by the resolver, the collector and the scheduler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectorError {
  /// Connection, DNS, timeout, HTTP status or API status failure
  #[error("Transport error: {0}")]
  Transport(String),

  /// Malformed or schema-violating payload
  #[error("Decode error: {0}")]
  Decode(String),

  #[error("All resolution tiers failed")]
  ResolutionExhausted,

  /// Failure reported by the persistence collaborator
  #[error("Persistence error: {0}")]
  Persistence(String),

  #[error("Resolution store is empty, nothing to collect")]
  EmptyResolution,

  /// Rejected settings, such as a zero collection interval
  #[error("Invalid configuration: {0}")]
  Config(String),

  /// Illegal lifecycle transition
  #[error("Scheduler state error: {0}")]
  SchedulerState(String),
}

impl From<cmc_core::Error> for CollectorError {
  fn from(err: cmc_core::Error) -> Self {
    match err {
      cmc_core::Error::Parse(_) | cmc_core::Error::Serde(_) => CollectorError::Decode(err.to_string()),
      cmc_core::Error::Config(msg) => CollectorError::Config(msg),
      other => CollectorError::Transport(other.to_string()),
    }
  }
}

/// Result type for collector operations.
pub type CollectorResult<T> = Result<T, CollectorError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_errors_become_decode() {
    let err: CollectorError = cmc_core::Error::Parse("unexpected end of input".to_string()).into();
    assert!(matches!(err, CollectorError::Decode(_)));
  }

  #[test]
  fn test_api_errors_become_transport() {
    let err: CollectorError =
      cmc_core::Error::Api { code: 400, message: "Invalid value for \"id\"".to_string() }.into();
    assert!(matches!(err, CollectorError::Transport(ref msg) if msg.contains("400")));

    let err: CollectorError = cmc_core::Error::Timeout(10).into();
    assert!(matches!(err, CollectorError::Transport(_)));
  }

  #[test]
  fn test_config_errors_stay_config() {
    let msg = "CMC_RATE_LIMIT must be greater than zero".to_string();
    let err: CollectorError = cmc_core::Error::Config(msg.clone()).into();
    assert_eq!(err, CollectorError::Config(msg));
  }
}

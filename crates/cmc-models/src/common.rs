/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Envelope shared by every CoinMarketCap response

use serde::{Deserialize, Serialize};

/// Status block returned with every CoinMarketCap response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiStatus {
  /// Server time of the response (ISO 8601)
  pub timestamp: String,

  /// 0 on success
  pub error_code: i64,

  /// Populated only when `error_code` is non-zero
  #[serde(default)]
  pub error_message: Option<String>,

  /// Server side processing time in milliseconds
  #[serde(default)]
  pub elapsed: Option<i64>,

  /// API credits charged for the call
  #[serde(default)]
  pub credit_count: Option<i64>,

  #[serde(default)]
  pub notice: Option<String>,
}

impl ApiStatus {
  pub fn is_ok(&self) -> bool {
    self.error_code == 0
  }
}

/// `{ "status": ..., "data": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
  pub status: ApiStatus,
  pub data: T,
}

/// Status-only view of an envelope, used to inspect error responses whose
/// `data` block is missing or has an unexpected shape.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusOnly {
  pub status: ApiStatus,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_status_nullable_fields() {
    let json = r#"{
      "timestamp": "2025-08-14T10:00:00.000Z",
      "error_code": 0,
      "error_message": null,
      "elapsed": 10,
      "credit_count": 1,
      "notice": null
    }"#;

    let status: ApiStatus = serde_json::from_str(json).unwrap();
    assert!(status.is_ok());
    assert_eq!(status.error_message, None);
    assert_eq!(status.notice, None);
    assert_eq!(status.credit_count, Some(1));
  }

  #[test]
  fn test_status_only_ignores_data() {
    let json = r#"{
      "status": {
        "timestamp": "2025-08-14T10:00:00.000Z",
        "error_code": 1002,
        "error_message": "API key missing.",
        "elapsed": 0,
        "credit_count": 0
      }
    }"#;

    let parsed: StatusOnly = serde_json::from_str(json).unwrap();
    assert!(!parsed.status.is_ok());
    assert_eq!(parsed.status.error_message.as_deref(), Some("API key missing."));
  }
}

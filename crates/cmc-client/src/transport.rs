/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! HTTP transport layer for CoinMarketCap API requests

use cmc_core::{Config, Error, Result, API_KEY_HEADER};
use cmc_models::StatusOnly;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Number of body characters echoed into parse errors
const BODY_PREVIEW_CHARS: usize = 200;

/// HTTP transport layer for making requests to the CoinMarketCap API
pub struct Transport {
  client: Client,
  api_key: String,
  timeout: Duration,
  max_retries: u32,
}

impl Transport {
  /// Create a new transport instance
  pub fn new(config: &Config) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout())
      .user_agent(concat!("cmc-client/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self::with_client(client, config))
  }

  /// Build on top of an existing reqwest client so connection pools can be shared
  pub fn with_client(client: Client, config: &Config) -> Self {
    Self {
      client,
      api_key: config.api_key.clone(),
      timeout: config.timeout(),
      max_retries: config.max_retries,
    }
  }

  /// Create a mock transport for testing
  #[cfg(test)]
  pub fn new_mock() -> Self {
    Self {
      client: Client::new(),
      api_key: "test_key".to_string(),
      timeout: Duration::from_secs(30),
      max_retries: 0,
    }
  }

  /// Make a GET request and decode the JSON body into `T`
  ///
  /// Connection failures, timeouts and 5xx responses are retried up to
  /// `max_retries` times. Client errors and API errors reported in the status
  /// block are returned immediately.
  #[instrument(skip(self, params), fields(url = %url))]
  pub async fn get<T>(&self, url: &str, params: &[(&'static str, String)]) -> Result<T>
  where
    T: DeserializeOwned,
  {
    let mut attempt = 0;

    loop {
      if attempt > 0 {
        let delay = cmc_core::retry_delay(attempt);
        warn!("Retrying request in {}ms (attempt {})", delay.as_millis(), attempt + 1);
        tokio::time::sleep(delay).await;
      }

      match self.fetch_text(url, params).await {
        Ok(text) => {
          debug!("Response body length: {} bytes", text.len());
          return decode(&text);
        }
        Err(e) if e.is_transient() && attempt < self.max_retries => {
          warn!("Request failed (attempt {}): {}", attempt + 1, e);
          attempt += 1;
        }
        Err(e) => return Err(e),
      }
    }
  }

  /// Execute the request and return the raw body of a successful response
  async fn fetch_text(&self, url: &str, params: &[(&'static str, String)]) -> Result<String> {
    let response = self
      .client
      .get(url)
      .header(API_KEY_HEADER, &self.api_key)
      .header(ACCEPT, "application/json")
      .query(params)
      .send()
      .await
      .map_err(|e| self.map_reqwest_error(e))?;

    let status = response.status();
    let text = response.text().await.map_err(|e| self.map_reqwest_error(e))?;

    if status.is_success() {
      return Ok(text);
    }

    error!("Request failed with status: {}", status);
    if status.is_server_error() {
      return Err(Error::Status(status.as_u16()));
    }
    if let Err(api_error) = check_api_error(&text) {
      return Err(api_error);
    }
    match status.as_u16() {
      401 | 403 => Err(Error::ApiKey(format!("HTTP {}", status))),
      429 => Err(Error::RateLimit(format!("HTTP {}", status))),
      code => Err(Error::Status(code)),
    }
  }

  fn map_reqwest_error(&self, e: reqwest::Error) -> Error {
    if e.is_timeout() {
      Error::Timeout(self.timeout.as_secs())
    } else {
      Error::Http(format!("Request failed: {}", e))
    }
  }

  /// Get request timeout duration
  pub fn timeout(&self) -> Duration {
    self.timeout
  }
}

impl std::fmt::Debug for Transport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Transport")
      .field("api_key", &"[redacted]")
      .field("timeout", &self.timeout)
      .field("max_retries", &self.max_retries)
      .finish()
  }
}

/// Check the status block first, then deserialize the full envelope
fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
  check_api_error(text)?;

  serde_json::from_str::<T>(text).map_err(|e| {
    let preview: String = text.chars().take(BODY_PREVIEW_CHARS).collect();
    error!("Failed to parse JSON response: {}", e);
    Error::Parse(format!("Failed to parse response: {}. Response: {}", e, preview))
  })
}

/// Map a non-zero `status.error_code` onto the error taxonomy
fn check_api_error(text: &str) -> Result<()> {
  let Ok(StatusOnly { status }) = serde_json::from_str::<StatusOnly>(text) else {
    return Ok(());
  };
  if status.is_ok() {
    return Ok(());
  }

  let message = status.error_message.unwrap_or_else(|| "Unknown CMC error".to_string());
  match status.error_code {
    1001 | 1002 => Err(Error::ApiKey(message)),
    1008..=1011 => Err(Error::RateLimit(message)),
    code => Err(Error::Api { code, message }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::Value;

  fn status_body(code: i64, message: &str) -> String {
    format!(
      r#"{{"status": {{"timestamp": "2025-08-14T10:00:00.000Z", "error_code": {}, "error_message": "{}", "elapsed": 0, "credit_count": 0}}}}"#,
      code, message
    )
  }

  #[test]
  fn test_check_api_error_rate_limit() {
    let result = check_api_error(&status_body(1008, "You've exceeded your API Key's HTTP request rate limit."));
    assert!(matches!(result, Err(Error::RateLimit(_))));
  }

  #[test]
  fn test_check_api_error_invalid_key() {
    let result = check_api_error(&status_body(1001, "This API Key is invalid."));
    assert!(matches!(result, Err(Error::ApiKey(_))));
  }

  #[test]
  fn test_check_api_error_other_code() {
    let result = check_api_error(&status_body(400, "Invalid value for \\\"id\\\""));
    match result {
      Err(Error::Api { code, .. }) => assert_eq!(code, 400),
      other => panic!("Expected Api error, got {:?}", other),
    }
  }

  #[test]
  fn test_check_api_error_success() {
    assert!(check_api_error(&status_body(0, "")).is_ok());
    assert!(check_api_error(r#"{"unexpected": true}"#).is_ok());
  }

  #[test]
  fn test_decode_truncated_body() {
    let result = decode::<Value>(r#"{"status": {"timestamp": "2025"#);
    assert!(matches!(result, Err(Error::Parse(_))));
  }

  #[test]
  fn test_decode_multibyte_preview_does_not_panic() {
    let body = "€".repeat(BODY_PREVIEW_CHARS * 2);
    assert!(matches!(decode::<Value>(&body), Err(Error::Parse(_))));
  }

  #[test]
  fn test_mock_transport() {
    let transport = Transport::new_mock();
    assert_eq!(transport.timeout(), Duration::from_secs(30));
    assert!(!format!("{:?}", transport).contains("test_key"));
  }
}

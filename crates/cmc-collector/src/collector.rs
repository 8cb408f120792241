/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Batched quote collection.

use async_trait::async_trait;
use cmc_client::CmcClient;
use cmc_models::{into_records, AuxField, QuoteRecord, COLLECTOR_AUX_FIELDS};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::{CollectorError, CollectorResult};
use crate::store::ResolutionView;
use crate::traits::QuoteSource;

/// Collector configuration.
#[derive(Debug, Clone)]
pub struct CollectorSettings {
  /// Reporting currency
  pub convert: String,
  pub aux: Vec<AuxField>,
  /// Upper bound for the whole fetch, retries included
  pub fetch_timeout: Duration,
}

impl Default for CollectorSettings {
  fn default() -> Self {
    Self {
      convert: cmc_core::DEFAULT_CONVERT.to_string(),
      aux: COLLECTOR_AUX_FIELDS.to_vec(),
      fetch_timeout: cmc_core::request_budget(
        Duration::from_secs(cmc_core::DEFAULT_TIMEOUT_SECS),
        cmc_core::DEFAULT_MAX_RETRIES,
        cmc_core::DEFAULT_RATE_LIMIT,
      ),
    }
  }
}

/// Fetches one quote snapshot for every id in the resolution store.
pub struct QuoteCollector {
  client: Arc<CmcClient>,
  view: ResolutionView,
  settings: CollectorSettings,
}

impl QuoteCollector {
  pub fn new(client: Arc<CmcClient>, view: ResolutionView, settings: CollectorSettings) -> Self {
    Self { client, view, settings }
  }

  /// Fetch and decode the latest quotes for the current map.
  ///
  /// Records come back ordered by provider id. A response with no records
  /// for a non-empty id set is a decode error. Nothing is staged here; the
  /// caller decides what to do with the snapshot.
  #[instrument(skip(self), fields(convert = %self.settings.convert))]
  pub async fn collect(&self) -> CollectorResult<Vec<QuoteRecord>> {
    let ids = self.view.ids();
    if ids.is_empty() {
      return Err(CollectorError::EmptyResolution);
    }
    debug!("Requesting quotes for {} ids", ids.len());

    let endpoint = self.client.quotes();
    let request = endpoint.latest(&ids, &self.settings.convert, &self.settings.aux);
    let response = tokio::time::timeout(self.settings.fetch_timeout, request)
      .await
      .map_err(|_| {
        CollectorError::Transport(format!("quotes request timed out after {:?}", self.settings.fetch_timeout))
      })??;

    let records = into_records(response.data)?;
    if records.is_empty() {
      return Err(CollectorError::Decode(format!("response carried no quotes for {} ids", ids.len())));
    }
    debug!("Decoded {} quote records", records.len());
    Ok(records)
  }
}

#[async_trait]
impl QuoteSource for QuoteCollector {
  async fn collect(&self) -> CollectorResult<Vec<QuoteRecord>> {
    QuoteCollector::collect(self).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::{ResolutionSnapshot, ResolutionSource, ResolutionStore};
  use cmc_core::{Config, ProviderId, Symbol};
  use cmc_models::ResolutionEntry;
  use pretty_assertions::assert_eq;
  use wiremock::matchers::{method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  const QUOTES_JSON: &str = r#"{
    "status": {"timestamp": "2025-08-14T10:00:00.000Z", "error_code": 0, "error_message": null, "elapsed": 12, "credit_count": 1, "notice": null},
    "data": {
      "1027": {"id": 1027, "name": "Ethereum", "symbol": "ETH", "slug": "ethereum",
               "circulating_supply": 120000000, "total_supply": 120000000, "max_supply": null,
               "last_updated": "2025-08-14T10:00:00.000Z",
               "quote": {"USD": {"price": 2500.0, "volume_24h": null, "volume_24h_reported": 9.1e9, "market_cap": 3.0e11,
                                 "percent_change_1h": null, "percent_change_24h": 1.1, "percent_change_7d": -2.0,
                                 "last_updated": "2025-08-14T10:00:00.000Z"}}},
      "1": {"id": 1, "name": "Bitcoin", "symbol": "BTC", "slug": "bitcoin",
            "circulating_supply": 19700000, "total_supply": 19700000, "max_supply": 21000000,
            "last_updated": "2025-08-14T10:00:00.000Z",
            "quote": {"USD": {"price": 42000.0, "volume_24h": 1.5e10, "volume_24h_reported": 1.6e10, "market_cap": 8.2e11,
                              "percent_change_1h": 0.1, "percent_change_24h": -1.2, "percent_change_7d": 3.4,
                              "last_updated": "2025-08-14T10:00:00.000Z"}}}
    }
  }"#;

  fn store_with(entries: &[(&str, u64)]) -> ResolutionStore {
    let store = ResolutionStore::new();
    let entries = entries
      .iter()
      .map(|(symbol, id)| ResolutionEntry::new(Symbol::new(symbol).unwrap(), ProviderId(*id)))
      .collect();
    store.publish(ResolutionSnapshot::from_entries(entries, ResolutionSource::Persisted));
    store
  }

  fn collector_for(server: &MockServer, store: &ResolutionStore) -> QuoteCollector {
    let mut config = Config::with_base_url("test_key".to_string(), &server.uri());
    config.max_retries = 0;
    let client = Arc::new(CmcClient::new(config).unwrap());
    QuoteCollector::new(client, store.view(), CollectorSettings::default())
  }

  #[tokio::test]
  async fn test_collect_btc_and_eth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/v2/cryptocurrency/quotes/latest"))
      .and(query_param("id", "1,1027"))
      .and(query_param("convert", "USD"))
      .and(query_param("aux", "circulating_supply,total_supply,max_supply,volume_24h_reported"))
      .respond_with(ResponseTemplate::new(200).set_body_string(QUOTES_JSON))
      .mount(&server)
      .await;

    let store = store_with(&[("ETH", 1027), ("BTC", 1)]);
    let collector = collector_for(&server, &store);
    let records = collector.collect().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, ProviderId(1));
    assert_eq!(records[0].price("USD"), Some(42000.0));
    assert_eq!(records[1].id, ProviderId(1027));
    assert_eq!(records[1].price("USD"), Some(2500.0));
  }

  #[tokio::test]
  async fn test_nulls_stay_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string(QUOTES_JSON))
      .mount(&server)
      .await;

    let store = store_with(&[("BTC", 1), ("ETH", 1027)]);
    let records = collector_for(&server, &store).collect().await.unwrap();

    let eth = &records[1];
    assert_eq!(eth.max_supply, None);
    let usd = eth.quote("USD").unwrap();
    assert_eq!(usd.volume_24h, None);
    assert_eq!(usd.percent_change_1h, None);
    assert_eq!(usd.volume_24h_reported, Some(9.1e9));
  }

  #[tokio::test]
  async fn test_collect_is_repeatable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string(QUOTES_JSON))
      .expect(2)
      .mount(&server)
      .await;

    let store = store_with(&[("BTC", 1), ("ETH", 1027)]);
    let collector = collector_for(&server, &store);

    let first = collector.collect().await.unwrap();
    let second = collector.collect().await.unwrap();
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn test_malformed_payload_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status": {"timestamp": "x", "error_code": 0}, "data": [1, 2"#))
      .mount(&server)
      .await;

    let store = store_with(&[("BTC", 1)]);
    let result = collector_for(&server, &store).collect().await;
    assert!(matches!(result, Err(CollectorError::Decode(_))));
  }

  #[tokio::test]
  async fn test_key_id_mismatch_is_decode_error() {
    let server = MockServer::start().await;
    let body = QUOTES_JSON.replace(r#""1027": {"id": 1027"#, r#""1027": {"id": 1028"#);
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string(body))
      .mount(&server)
      .await;

    let store = store_with(&[("BTC", 1), ("ETH", 1027)]);
    let result = collector_for(&server, &store).collect().await;
    assert!(matches!(result, Err(CollectorError::Decode(_))));
  }

  #[tokio::test]
  async fn test_api_error_code_is_transport_error() {
    let server = MockServer::start().await;
    let body = r#"{"status": {"timestamp": "2025-08-14T10:00:00.000Z", "error_code": 1008, "error_message": "You've exceeded your API Key's HTTP request rate limit."}}"#;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string(body))
      .mount(&server)
      .await;

    let store = store_with(&[("BTC", 1)]);
    let result = collector_for(&server, &store).collect().await;
    assert!(matches!(result, Err(CollectorError::Transport(_))));
  }

  #[tokio::test]
  async fn test_slow_upstream_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string(QUOTES_JSON).set_delay(Duration::from_secs(5)))
      .mount(&server)
      .await;

    let store = store_with(&[("BTC", 1)]);
    let mut collector = collector_for(&server, &store);
    collector.settings.fetch_timeout = Duration::from_millis(200);

    let result = collector.collect().await;
    assert!(matches!(result, Err(CollectorError::Transport(ref msg)) if msg.contains("timed out")));
  }

  #[tokio::test]
  async fn test_slow_first_attempt_then_retry_fits_fetch_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string(QUOTES_JSON).set_delay(Duration::from_secs(3)))
      .up_to_n_times(1)
      .mount(&server)
      .await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string(QUOTES_JSON).set_delay(Duration::from_millis(800)))
      .mount(&server)
      .await;

    let mut config = Config::with_base_url("test_key".to_string(), &server.uri());
    config.timeout_secs = 1;
    config.max_retries = 1;
    config.rate_limit = 60;
    let settings = CollectorSettings { fetch_timeout: config.request_budget(), ..CollectorSettings::default() };
    let client = Arc::new(CmcClient::new(config).unwrap());

    let store = store_with(&[("BTC", 1), ("ETH", 1027)]);
    let collector = QuoteCollector::new(client, store.view(), settings);

    // 1s timeout + 500ms backoff + 800ms reply is past 2 x timeout
    let records = collector.collect().await.unwrap();
    assert_eq!(records.len(), 2);
  }

  #[tokio::test]
  async fn test_empty_data_is_decode_error() {
    let server = MockServer::start().await;
    let body = r#"{"status": {"timestamp": "2025-08-14T10:00:00.000Z", "error_code": 0, "error_message": null}, "data": {}}"#;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string(body))
      .mount(&server)
      .await;

    let store = store_with(&[("BTC", 1), ("ETH", 1027)]);
    let result = collector_for(&server, &store).collect().await;
    assert!(matches!(result, Err(CollectorError::Decode(ref msg)) if msg.contains("no quotes")));
  }

  #[tokio::test]
  async fn test_empty_store_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let store = ResolutionStore::new();
    let result = collector_for(&server, &store).collect().await;
    assert_eq!(result.unwrap_err(), CollectorError::EmptyResolution);
  }
}

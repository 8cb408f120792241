/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Resolve, collect and stage against a mock CoinMarketCap server.

use async_trait::async_trait;
use cmc_collector::prelude::*;
use cmc_collector::{ResolutionSource, SchedulerState};
use cmc_models::QuoteRecord;
use pretty_assertions::assert_eq;
use std::sync::Mutex;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MAP_JSON: &str = r#"{
  "status": {"timestamp": "2025-08-14T10:00:00.000Z", "error_code": 0, "error_message": null, "elapsed": 5, "credit_count": 1, "notice": null},
  "data": [
    {"id": 1, "rank": 1, "name": "Bitcoin", "symbol": "BTC", "slug": "bitcoin", "is_active": 1},
    {"id": 1027, "rank": 2, "name": "Ethereum", "symbol": "ETH", "slug": "ethereum", "is_active": 1}
  ]
}"#;

const QUOTES_JSON: &str = r#"{
  "status": {"timestamp": "2025-08-14T10:00:00.000Z", "error_code": 0, "error_message": null, "elapsed": 9, "credit_count": 1, "notice": null},
  "data": {
    "1": {"id": 1, "name": "Bitcoin", "symbol": "BTC", "slug": "bitcoin",
          "circulating_supply": 19700000, "total_supply": 19700000, "max_supply": 21000000,
          "last_updated": "2025-08-14T10:00:00.000Z",
          "quote": {"USD": {"price": 42000.0, "volume_24h": 1.5e10, "market_cap": 8.2e11,
                            "percent_change_1h": 0.1, "percent_change_24h": -1.2, "percent_change_7d": 3.4,
                            "last_updated": "2025-08-14T10:00:00.000Z"}}},
    "1027": {"id": 1027, "name": "Ethereum", "symbol": "ETH", "slug": "ethereum",
             "circulating_supply": 120000000, "total_supply": 120000000, "max_supply": null,
             "last_updated": "2025-08-14T10:00:00.000Z",
             "quote": {"USD": {"price": 2500.0, "volume_24h": 9.0e9, "market_cap": 3.0e11,
                               "percent_change_1h": null, "percent_change_24h": 1.1, "percent_change_7d": -2.0,
                               "last_updated": "2025-08-14T10:00:00.000Z"}}}
  }
}"#;

#[derive(Default)]
struct MemorySink {
  snapshots: Mutex<Vec<Vec<QuoteRecord>>>,
}

#[async_trait]
impl QuoteRepository for MemorySink {
  async fn put_quote_snapshot(&self, records: &[QuoteRecord]) -> CollectorResult<usize> {
    self.snapshots.lock().unwrap().push(records.to_vec());
    Ok(records.len())
  }
}

fn client_for(server: &MockServer) -> Arc<CmcClient> {
  let mut config = Config::with_base_url("test_key".to_string(), &server.uri());
  config.max_retries = 0;
  Arc::new(CmcClient::new(config).unwrap())
}

#[tokio::test]
async fn test_resolve_collect_and_stage() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v1/cryptocurrency/map"))
    .and(query_param("sort", "cmc_rank"))
    .respond_with(ResponseTemplate::new(200).set_body_string(MAP_JSON))
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/v2/cryptocurrency/quotes/latest"))
    .and(query_param("id", "1,1027"))
    .respond_with(ResponseTemplate::new(200).set_body_string(QUOTES_JSON))
    .mount(&server)
    .await;

  let client = client_for(&server);
  let resolver = IdResolver::standard(client.clone(), None, &ResolverSettings::default());
  let snapshot = resolver.resolve(&[]).await.unwrap();
  assert_eq!(snapshot.source(), Some(ResolutionSource::Remote));

  let collector = QuoteCollector::new(client, resolver.view(), CollectorSettings::default());
  let sink = Arc::new(MemorySink::default());
  let mut scheduler =
    Scheduler::new(Duration::from_millis(200), Arc::new(collector), sink.clone()).unwrap();

  scheduler.start().unwrap();
  tokio::time::sleep(Duration::from_millis(700)).await;
  assert_eq!(scheduler.state(), SchedulerState::Running);
  scheduler.stop().await.unwrap();

  let snapshots = sink.snapshots.lock().unwrap();
  assert!(snapshots.len() >= 2, "expected at least two cycles, got {}", snapshots.len());
  let latest = snapshots.last().unwrap();
  let prices: Vec<(u64, Option<f64>)> = latest.iter().map(|r| (r.id.value(), r.price("USD"))).collect();
  assert_eq!(prices, vec![(1, Some(42000.0)), (1027, Some(2500.0))]);
  assert_eq!(scheduler.stats().failed, 0);
}

#[tokio::test]
async fn test_static_fallback_when_remote_is_down() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v1/cryptocurrency/map"))
    .respond_with(ResponseTemplate::new(503))
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/v2/cryptocurrency/quotes/latest"))
    .and(query_param("id", "1,1027,5994"))
    .respond_with(ResponseTemplate::new(200).set_body_string(QUOTES_JSON))
    .expect(1)
    .mount(&server)
    .await;

  let client = client_for(&server);
  let resolver = IdResolver::standard(client.clone(), None, &ResolverSettings::default());
  let snapshot = resolver.resolve(&[Symbol::new("BTC").unwrap()]).await.unwrap();
  assert_eq!(snapshot.source(), Some(ResolutionSource::Static));
  assert_eq!(snapshot.len(), 3);

  let collector = QuoteCollector::new(client, resolver.view(), CollectorSettings::default());
  let records = collector.collect().await.unwrap();
  assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_malformed_quotes_stage_nothing() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v1/cryptocurrency/map"))
    .respond_with(ResponseTemplate::new(200).set_body_string(MAP_JSON))
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/v2/cryptocurrency/quotes/latest"))
    .respond_with(ResponseTemplate::new(200).set_body_string("{\"status\": {\"timestamp\": \"2025\", \"error_code\": 0}, \"data\": "))
    .mount(&server)
    .await;

  let client = client_for(&server);
  let resolver = IdResolver::standard(client.clone(), None, &ResolverSettings::default());
  resolver.resolve(&[]).await.unwrap();

  let collector = QuoteCollector::new(client, resolver.view(), CollectorSettings::default());
  assert!(matches!(collector.collect().await, Err(CollectorError::Decode(_))));

  let sink = Arc::new(MemorySink::default());
  let mut scheduler = Scheduler::new(Duration::from_millis(100), Arc::new(collector), sink.clone()).unwrap();
  scheduler.start().unwrap();
  tokio::time::sleep(Duration::from_millis(350)).await;
  scheduler.stop().await.unwrap();

  assert!(sink.snapshots.lock().unwrap().is_empty());
  assert!(scheduler.stats().failed >= 2);
  assert_eq!(scheduler.stats().succeeded, 0);
}

#[tokio::test]
async fn test_empty_quotes_keep_last_snapshot() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v1/cryptocurrency/map"))
    .respond_with(ResponseTemplate::new(200).set_body_string(MAP_JSON))
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/v2/cryptocurrency/quotes/latest"))
    .respond_with(ResponseTemplate::new(200).set_body_string(
      r#"{"status": {"timestamp": "2025-08-14T10:00:00.000Z", "error_code": 0, "error_message": null}, "data": {}}"#,
    ))
    .mount(&server)
    .await;

  let client = client_for(&server);
  let resolver = IdResolver::standard(client.clone(), None, &ResolverSettings::default());
  resolver.resolve(&[]).await.unwrap();

  let collector = QuoteCollector::new(client, resolver.view(), CollectorSettings::default());
  let sink = Arc::new(MemorySink::default());
  let mut scheduler = Scheduler::new(Duration::from_millis(100), Arc::new(collector), sink.clone()).unwrap();
  scheduler.start().unwrap();
  tokio::time::sleep(Duration::from_millis(350)).await;
  scheduler.stop().await.unwrap();

  // no empty snapshot ever reaches the sink
  assert!(sink.snapshots.lock().unwrap().is_empty());
  assert!(scheduler.stats().failed >= 2);
  assert_eq!(scheduler.stats().succeeded, 0);
}

/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

use cmc_client::CmcClient;
use cmc_core::Symbol;
use cmc_models::ResolutionEntry;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use super::tiers::{PersistedTier, RemoteTier, ResolutionStrategy, StaticTier};
use crate::error::{CollectorError, CollectorResult};
use crate::store::{ResolutionSnapshot, ResolutionStore, ResolutionView};
use crate::traits::ResolutionRepository;

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
  /// Upper bound for each tier attempt and each ad-hoc lookup. Should cover
  /// the client's retries, see `Config::request_budget`.
  pub tier_timeout: Duration,
  /// How many assets the remote tier asks for when no symbols are given
  pub top_limit: u32,
}

impl Default for ResolverSettings {
  fn default() -> Self {
    Self {
      tier_timeout: cmc_core::request_budget(
        Duration::from_secs(cmc_core::DEFAULT_TIMEOUT_SECS),
        cmc_core::DEFAULT_MAX_RETRIES,
        cmc_core::DEFAULT_RATE_LIMIT,
      ),
      top_limit: 10,
    }
  }
}

/// Builds and owns the resolution store.
pub struct IdResolver {
  client: Arc<CmcClient>,
  tiers: Vec<Box<dyn ResolutionStrategy>>,
  store: ResolutionStore,
  tier_timeout: Duration,
}

impl IdResolver {
  /// Create a resolver with an explicit tier order.
  pub fn new(client: Arc<CmcClient>, tiers: Vec<Box<dyn ResolutionStrategy>>, tier_timeout: Duration) -> Self {
    Self { client, tiers, store: ResolutionStore::new(), tier_timeout }
  }

  /// Persisted (when a repository is given), then remote, then static.
  pub fn standard(
    client: Arc<CmcClient>,
    repository: Option<Arc<dyn ResolutionRepository>>,
    settings: &ResolverSettings,
  ) -> Self {
    let mut tiers: Vec<Box<dyn ResolutionStrategy>> = Vec::with_capacity(3);
    if let Some(repository) = repository {
      tiers.push(Box::new(PersistedTier::new(repository)));
    }
    tiers.push(Box::new(RemoteTier::new(Arc::clone(&client), settings.top_limit)));
    tiers.push(Box::new(StaticTier));

    Self::new(client, tiers, settings.tier_timeout)
  }

  /// Read-only handle for the collector
  pub fn view(&self) -> ResolutionView {
    self.store.view()
  }

  /// Currently published map
  pub fn snapshot(&self) -> Arc<ResolutionSnapshot> {
    self.store.snapshot()
  }

  /// Walk the tiers in order and publish the first non-empty result.
  ///
  /// Tier failures are logged and skipped. Only when every tier fails is
  /// `ResolutionExhausted` returned, and the previous map stays in place.
  #[instrument(skip(self), fields(requested = symbols.len()))]
  pub async fn resolve(&self, symbols: &[Symbol]) -> CollectorResult<Arc<ResolutionSnapshot>> {
    for tier in &self.tiers {
      let source = tier.source();
      match tokio::time::timeout(self.tier_timeout, tier.attempt(symbols)).await {
        Ok(Ok(entries)) if !entries.is_empty() => {
          let snapshot = ResolutionSnapshot::from_entries(entries, source);
          info!("Resolved {} symbols from {} tier", snapshot.len(), source);
          self.store.publish(snapshot);
          return Ok(self.store.snapshot());
        }
        Ok(Ok(_)) => warn!("{} tier returned no entries, falling back", source),
        Ok(Err(e)) => warn!("{} tier failed, falling back: {}", source, e),
        Err(_) => warn!("{} tier timed out after {:?}, falling back", source, self.tier_timeout),
      }
    }

    error!("Every resolution tier failed");
    Err(CollectorError::ResolutionExhausted)
  }

  /// Re-run the tier chain and swap in the new map
  pub async fn refresh(&self, symbols: &[Symbol]) -> CollectorResult<Arc<ResolutionSnapshot>> {
    let previous = self.store.snapshot().len();
    let snapshot = self.resolve(symbols).await?;
    info!("Refreshed resolution map: {} -> {} entries", previous, snapshot.len());
    Ok(snapshot)
  }

  /// Write the current map through `repository`, replacing what is stored.
  ///
  /// An empty map is never written.
  pub async fn persist(&self, repository: &dyn ResolutionRepository) -> CollectorResult<usize> {
    let snapshot = self.store.snapshot();
    if snapshot.is_empty() {
      warn!("Resolution map is empty, nothing persisted");
      return Ok(0);
    }

    let written = repository.put_resolution_map(&snapshot.to_vec()).await?;
    info!("Persisted {} resolution entries", written);
    Ok(written)
  }

  /// Every asset listed under `symbol`. Does not touch the store.
  #[instrument(skip(self, symbol), fields(symbol = %symbol))]
  pub async fn lookup_symbol(&self, symbol: &Symbol) -> CollectorResult<Vec<ResolutionEntry>> {
    let endpoint = self.client.id_map();
    self.bounded(endpoint.by_symbols(std::slice::from_ref(symbol))).await
  }

  /// Top `limit` assets by rank. Does not touch the store.
  #[instrument(skip(self))]
  pub async fn top_coins(&self, limit: u32) -> CollectorResult<Vec<ResolutionEntry>> {
    let endpoint = self.client.id_map();
    self.bounded(endpoint.top_coins(limit)).await
  }

  async fn bounded<F>(&self, request: F) -> CollectorResult<Vec<ResolutionEntry>>
  where
    F: Future<Output = cmc_core::Result<Vec<ResolutionEntry>>>,
  {
    match tokio::time::timeout(self.tier_timeout, request).await {
      Ok(result) => Ok(result?),
      Err(_) => Err(CollectorError::Transport(format!("lookup timed out after {:?}", self.tier_timeout))),
    }
  }
}

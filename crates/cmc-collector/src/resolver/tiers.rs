/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

use async_trait::async_trait;
use cmc_client::CmcClient;
use cmc_core::{ProviderId, Symbol};
use cmc_models::ResolutionEntry;
use std::sync::Arc;
use tracing::debug;

use crate::error::CollectorResult;
use crate::store::ResolutionSource;
use crate::traits::ResolutionRepository;

/// Last-resort table, so the collector never starts without ids.
///
/// (symbol, provider id, name, slug)
pub const STATIC_FALLBACK: [(&str, u64, &str, &str); 3] = [
  ("BTC", 1, "Bitcoin", "bitcoin"),
  ("ETH", 1027, "Ethereum", "ethereum"),
  ("SOL", 5994, "Solana", "solana"),
];

/// One tier of the resolution chain.
///
/// An error or an empty vector both mean "unavailable"; the resolver moves on
/// to the next tier either way.
#[async_trait]
pub trait ResolutionStrategy: Send + Sync {
  fn source(&self) -> ResolutionSource;

  /// Produce entries for `symbols`, or for whatever this tier considers the
  /// default set when `symbols` is empty.
  async fn attempt(&self, symbols: &[Symbol]) -> CollectorResult<Vec<ResolutionEntry>>;
}

/// Previously stored map
pub struct PersistedTier {
  repository: Arc<dyn ResolutionRepository>,
}

impl PersistedTier {
  pub fn new(repository: Arc<dyn ResolutionRepository>) -> Self {
    Self { repository }
  }
}

#[async_trait]
impl ResolutionStrategy for PersistedTier {
  fn source(&self) -> ResolutionSource {
    ResolutionSource::Persisted
  }

  async fn attempt(&self, symbols: &[Symbol]) -> CollectorResult<Vec<ResolutionEntry>> {
    let mut entries = self.repository.get_resolution_map().await?;
    debug!("Persisted map holds {} entries", entries.len());

    if !symbols.is_empty() {
      entries.retain(|entry| symbols.contains(&entry.symbol));
    }
    Ok(entries)
  }
}

/// Live lookup against the map endpoint
pub struct RemoteTier {
  client: Arc<CmcClient>,
  limit: u32,
}

impl RemoteTier {
  pub fn new(client: Arc<CmcClient>, limit: u32) -> Self {
    Self { client, limit }
  }
}

#[async_trait]
impl ResolutionStrategy for RemoteTier {
  fn source(&self) -> ResolutionSource {
    ResolutionSource::Remote
  }

  async fn attempt(&self, symbols: &[Symbol]) -> CollectorResult<Vec<ResolutionEntry>> {
    let endpoint = self.client.id_map();
    let entries = if symbols.is_empty() {
      endpoint.top_coins(self.limit).await?
    } else {
      endpoint.by_symbols(symbols).await?
    };
    Ok(entries)
  }
}

/// Hard-coded fallback. Always returns the whole table.
#[derive(Debug, Default)]
pub struct StaticTier;

#[async_trait]
impl ResolutionStrategy for StaticTier {
  fn source(&self) -> ResolutionSource {
    ResolutionSource::Static
  }

  async fn attempt(&self, _symbols: &[Symbol]) -> CollectorResult<Vec<ResolutionEntry>> {
    STATIC_FALLBACK
      .iter()
      .map(|(symbol, id, name, slug)| -> CollectorResult<ResolutionEntry> {
        Ok(ResolutionEntry::new(Symbol::new(symbol)?, ProviderId(*id)).with_name(name, slug))
      })
      .collect()
  }
}

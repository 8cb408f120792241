/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Collaborator interfaces.
//!
//! These keep the resolver, collector and scheduler independent of any
//! particular database or HTTP stack.

use async_trait::async_trait;
use cmc_models::{QuoteRecord, ResolutionEntry};

use crate::error::CollectorResult;

/// Durable storage for the symbol to id map.
#[async_trait]
pub trait ResolutionRepository: Send + Sync {
  /// Every previously resolved entry. An empty vector means nothing is stored.
  async fn get_resolution_map(&self) -> CollectorResult<Vec<ResolutionEntry>>;

  /// Replace the stored map with `entries`.
  async fn put_resolution_map(&self, entries: &[ResolutionEntry]) -> CollectorResult<usize>;
}

/// Durable storage for the latest quote snapshot.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
  /// Replace the stored snapshot with `records`, returning how many were written.
  async fn put_quote_snapshot(&self, records: &[QuoteRecord]) -> CollectorResult<usize>;
}

/// Anything that can produce one complete quote snapshot per call.
#[async_trait]
pub trait QuoteSource: Send + Sync {
  async fn collect(&self) -> CollectorResult<Vec<QuoteRecord>>;
}

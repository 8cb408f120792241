/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! PostgreSQL implementations of the collector's storage traits.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use cmc_collector::{CollectorError, CollectorResult, QuoteRepository, ResolutionRepository};
use cmc_database_postgres::{CoinRepository, CoinRepositoryImpl, DatabaseContext, RepositoryError};
use cmc_models::{QuoteRecord, ResolutionEntry};
use tracing::info;

pub struct PostgresStore {
  repository: CoinRepositoryImpl,
}

impl PostgresStore {
  /// Connect, build the pool and apply pending migrations
  pub async fn connect(database_url: &str) -> Result<Self> {
    let url = database_url.to_string();
    let context = tokio::task::spawn_blocking(move || -> Result<DatabaseContext> {
      let context = DatabaseContext::new(&url).context("Failed to connect to database")?;
      context.run_migrations().context("Failed to run database migrations")?;
      Ok(context)
    })
    .await
    .context("Database setup task failed")??;

    info!("Connected to PostgreSQL");
    Ok(Self { repository: context.coin_repository() })
  }
}

fn persistence_error(err: RepositoryError) -> CollectorError {
  CollectorError::Persistence(err.to_string())
}

#[async_trait]
impl ResolutionRepository for PostgresStore {
  async fn get_resolution_map(&self) -> CollectorResult<Vec<ResolutionEntry>> {
    self.repository.load_id_map().await.map_err(persistence_error)
  }

  async fn put_resolution_map(&self, entries: &[ResolutionEntry]) -> CollectorResult<usize> {
    self.repository.replace_id_map(entries).await.map_err(persistence_error)
  }
}

#[async_trait]
impl QuoteRepository for PostgresStore {
  async fn put_quote_snapshot(&self, records: &[QuoteRecord]) -> CollectorResult<usize> {
    self.repository.replace_quote_snapshot(records, Utc::now()).await.map_err(persistence_error)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_repository_errors_become_persistence_errors() {
    let err = persistence_error(RepositoryError::PoolError("connection refused".to_string()));
    assert!(matches!(err, CollectorError::Persistence(ref msg) if msg.contains("connection refused")));
  }
}

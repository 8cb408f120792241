/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Database repository abstraction layer
//!
//! Connection pooling, migrations and the coin repository used by the
//! collector. Every write replaces a whole snapshot inside one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cmc_models::{QuoteRecord, ResolutionEntry};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::Error as DieselError;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::{debug, error, info};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::quote::{record_to_rows, rows_to_record};
use crate::models::{CmcIdMapRow, CoinQuotePriceRow, CoinQuoteRow, NewCmcIdMapRow};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

const MAX_POOL_SIZE: u32 = 8;
const MIN_POOL_IDLE: u32 = 1;
/// Connection timeout in seconds - pool will fail instead of retrying forever
const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Database repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
  #[error("Connection pool error: {0}")]
  PoolError(String),

  #[error("Database query error: {0}")]
  QueryError(String),

  #[error("Insert error: {0}")]
  InsertError(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Constraint violation: {0}")]
  ConstraintViolation(String),

  #[error("Transaction error: {0}")]
  TransactionError(String),

  #[error("Migration error: {0}")]
  MigrationError(String),

  #[error("Conversion error: {0}")]
  Conversion(String),
}

impl From<DieselError> for RepositoryError {
  fn from(err: DieselError) -> Self {
    match err {
      DieselError::NotFound => RepositoryError::NotFound("Record not found".to_string()),
      DieselError::DatabaseError(kind, info) => match kind {
        diesel::result::DatabaseErrorKind::UniqueViolation
        | diesel::result::DatabaseErrorKind::ForeignKeyViolation => {
          RepositoryError::ConstraintViolation(info.message().to_string())
        }
        _ => RepositoryError::QueryError(info.message().to_string()),
      },
      _ => RepositoryError::QueryError(err.to_string()),
    }
  }
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
  fn from(err: diesel::r2d2::PoolError) -> Self {
    RepositoryError::PoolError(err.to_string())
  }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Database context that provides access to repositories and connection pool
#[derive(Clone)]
pub struct DatabaseContext {
  pool: Arc<DbPool>,
}

impl DatabaseContext {
  /// Create a new database context with connection pooling
  ///
  /// Fails fast if the database is unavailable by testing the connection at startup.
  pub fn new(database_url: &str) -> RepositoryResult<Self> {
    Self::with_pool_config(database_url, MAX_POOL_SIZE, MIN_POOL_IDLE)
  }

  /// Create with custom pool configuration
  pub fn with_pool_config(database_url: &str, max_size: u32, min_idle: u32) -> RepositoryResult<Self> {
    // Probe once so an unreachable server fails here instead of inside r2d2's retry loop
    PgConnection::establish(database_url)
      .map_err(|e| RepositoryError::PoolError(format!("Failed to connect to database: {}", e)))?;

    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
      .max_size(max_size)
      .min_idle(Some(min_idle))
      .connection_timeout(Duration::from_secs(CONNECTION_TIMEOUT_SECS))
      .build(manager)
      .map_err(|e| RepositoryError::PoolError(e.to_string()))?;

    Ok(Self { pool: Arc::new(pool) })
  }

  /// Get a connection from the pool
  pub fn get_connection(&self) -> RepositoryResult<DbConnection> {
    self.pool.get().map_err(|e| RepositoryError::PoolError(e.to_string()))
  }

  /// Apply any pending embedded migrations
  pub fn run_migrations(&self) -> RepositoryResult<usize> {
    let mut conn = self.get_connection()?;
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
      error!("Database migration failed: {}", e);
      RepositoryError::MigrationError(e.to_string())
    })?;

    if applied.is_empty() {
      info!("No pending migrations to apply");
    } else {
      info!("Applied {} migration(s)", applied.len());
    }
    Ok(applied.len())
  }

  /// Create a coin repository instance
  pub fn coin_repository(&self) -> CoinRepositoryImpl {
    CoinRepositoryImpl::new(Arc::clone(&self.pool))
  }
}

/// Run a delete-then-insert snapshot write atomically
fn snapshot_transaction<F>(conn: &mut DbConnection, f: F) -> RepositoryResult<usize>
where
  F: FnOnce(&mut DbConnection) -> RepositoryResult<usize>,
{
  conn.transaction(f).map_err(|e| match e {
    RepositoryError::QueryError(msg) => RepositoryError::TransactionError(msg),
    other => other,
  })
}

/// Persistence for the symbol map and the latest quote snapshot
#[async_trait]
pub trait CoinRepository: Send + Sync {
  /// Load every stored symbol mapping, ordered by symbol
  async fn load_id_map(&self) -> RepositoryResult<Vec<ResolutionEntry>>;

  /// Replace the stored symbol map with `entries`
  async fn replace_id_map(&self, entries: &[ResolutionEntry]) -> RepositoryResult<usize>;

  /// Replace the stored quote snapshot with `records`
  async fn replace_quote_snapshot(
    &self,
    records: &[QuoteRecord],
    collected_at: DateTime<Utc>,
  ) -> RepositoryResult<usize>;

  /// Load the stored quote snapshot, ordered by provider id
  async fn load_quote_snapshot(&self) -> RepositoryResult<Vec<QuoteRecord>>;
}

/// Implementation of CoinRepository using PostgreSQL
pub struct CoinRepositoryImpl {
  pool: Arc<DbPool>,
}

impl CoinRepositoryImpl {
  pub fn new(pool: Arc<DbPool>) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CoinRepository for CoinRepositoryImpl {
  async fn load_id_map(&self) -> RepositoryResult<Vec<ResolutionEntry>> {
    let pool = self.pool.clone();

    tokio::task::spawn_blocking(move || {
      use crate::schema::cmc_id_map::dsl::*;
      let mut conn = pool.get()?;

      let rows: Vec<CmcIdMapRow> =
        cmc_id_map.order(symbol.asc()).select(CmcIdMapRow::as_select()).load(&mut conn)?;
      debug!("Loaded {} id map rows", rows.len());

      rows.into_iter().map(ResolutionEntry::try_from).collect()
    })
    .await
    .map_err(|e| RepositoryError::QueryError(format!("Task join error: {}", e)))?
  }

  async fn replace_id_map(&self, entries: &[ResolutionEntry]) -> RepositoryResult<usize> {
    let pool = self.pool.clone();
    let now = Utc::now();
    let rows = entries
      .iter()
      .map(|entry| NewCmcIdMapRow::from_entry(entry, now))
      .collect::<RepositoryResult<Vec<_>>>()?;

    tokio::task::spawn_blocking(move || {
      use crate::schema::cmc_id_map;
      let mut conn = pool.get()?;

      snapshot_transaction(&mut conn, |conn| {
        let removed = diesel::delete(cmc_id_map::table).execute(conn)?;
        if rows.is_empty() {
          return Ok(0);
        }
        let inserted = diesel::insert_into(cmc_id_map::table)
          .values(&rows)
          .execute(conn)
          .map_err(|e| RepositoryError::InsertError(e.to_string()))?;
        debug!("Replaced id map: {} removed, {} inserted", removed, inserted);
        Ok(inserted)
      })
    })
    .await
    .map_err(|e| RepositoryError::QueryError(format!("Task join error: {}", e)))?
  }

  async fn replace_quote_snapshot(
    &self,
    records: &[QuoteRecord],
    collected_at: DateTime<Utc>,
  ) -> RepositoryResult<usize> {
    let pool = self.pool.clone();
    let mut coins = Vec::with_capacity(records.len());
    let mut prices = Vec::new();
    for record in records {
      let (coin, coin_prices) = record_to_rows(record, collected_at)?;
      coins.push(coin);
      prices.extend(coin_prices);
    }

    tokio::task::spawn_blocking(move || {
      use crate::schema::{coin_quote_prices, coin_quotes};
      let mut conn = pool.get()?;

      snapshot_transaction(&mut conn, |conn| {
        diesel::delete(coin_quote_prices::table).execute(conn)?;
        diesel::delete(coin_quotes::table).execute(conn)?;
        if coins.is_empty() {
          return Ok(0);
        }

        let inserted = diesel::insert_into(coin_quotes::table)
          .values(&coins)
          .execute(conn)
          .map_err(|e| RepositoryError::InsertError(e.to_string()))?;
        if !prices.is_empty() {
          diesel::insert_into(coin_quote_prices::table)
            .values(&prices)
            .execute(conn)
            .map_err(|e| RepositoryError::InsertError(e.to_string()))?;
        }

        debug!("Stored quote snapshot of {} coins and {} prices", inserted, prices.len());
        Ok(inserted)
      })
    })
    .await
    .map_err(|e| RepositoryError::QueryError(format!("Task join error: {}", e)))?
  }

  async fn load_quote_snapshot(&self) -> RepositoryResult<Vec<QuoteRecord>> {
    let pool = self.pool.clone();

    tokio::task::spawn_blocking(move || {
      use crate::schema::{coin_quote_prices, coin_quotes};
      let mut conn = pool.get()?;

      let coins: Vec<CoinQuoteRow> = coin_quotes::table
        .order(coin_quotes::cmc_id.asc())
        .select(CoinQuoteRow::as_select())
        .load(&mut conn)?;
      let prices: Vec<CoinQuotePriceRow> = coin_quote_prices::table
        .select(CoinQuotePriceRow::as_select())
        .load(&mut conn)?;

      let mut by_coin: HashMap<i64, Vec<CoinQuotePriceRow>> = HashMap::new();
      for price in prices {
        by_coin.entry(price.cmc_id).or_default().push(price);
      }

      coins
        .into_iter()
        .map(|coin| {
          let coin_prices = by_coin.remove(&coin.cmc_id).unwrap_or_default();
          rows_to_record(coin, coin_prices)
        })
        .collect()
    })
    .await
    .map_err(|e| RepositoryError::QueryError(format!("Task join error: {}", e)))?
  }
}

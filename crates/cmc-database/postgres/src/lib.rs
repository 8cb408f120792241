/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! PostgreSQL persistence for the CoinMarketCap collector
//!
//! Tables are created by the embedded migrations in `migrations/`; call
//! [`DatabaseContext::run_migrations`] once at startup.

pub mod models;
pub mod repository;
pub mod schema;

// Re-export commonly used items
pub use repository::{
  CoinRepository, CoinRepositoryImpl, DatabaseContext, DbConnection, DbPool, RepositoryError,
  RepositoryResult,
};

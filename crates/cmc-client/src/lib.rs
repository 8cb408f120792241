/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! # cmc-client
//!
//! Async client for the two CoinMarketCap endpoints the collector needs:
//! the ID map (`/v1/cryptocurrency/map`) and latest quotes
//! (`/v2/cryptocurrency/quotes/latest`).
//!
//! ## Features
//!
//! - Shared `governor` rate limiter per client
//! - Bounded retry with exponential backoff for connection failures and 5xx
//! - Status-block error codes mapped onto `cmc_core::Error`
//! - `tracing` spans around every request; the API key is never logged
//!
//! ## Example
//!
//! ```ignore
//! use cmc_client::CmcClient;
//! use cmc_core::Config;
//!
//! let client = CmcClient::new(Config::from_env()?)?;
//! let btc = client.id_map().by_symbols(&["BTC".parse()?]).await?;
//! ```

#![warn(clippy::all)]

pub mod client;
pub mod endpoints;
pub mod transport;

pub use client::CmcClient;
pub use cmc_core::{Config, Error, Result};
pub use endpoints::{
  SharedRateLimiter,
  id_map::{IdMapEndpoints, IdMapQuery},
  quotes::{QuotesEndpoints, quotes_params},
};

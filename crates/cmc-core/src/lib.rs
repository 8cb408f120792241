/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Core types and configuration shared by the CoinMarketCap collector crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::{request_budget, retry_delay, Config};
pub use error::{Error, Result};
pub use types::{ProviderId, Symbol};

/// Base URL for the CoinMarketCap Pro API
pub const CMC_BASE_URL: &str = "https://pro-api.coinmarketcap.com";

/// Path of the ID map endpoint, relative to the base URL
pub const ID_MAP_PATH: &str = "/v1/cryptocurrency/map";

/// Path of the latest quotes endpoint, relative to the base URL
pub const QUOTES_LATEST_PATH: &str = "/v2/cryptocurrency/quotes/latest";

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// Reporting currency used when none is configured
pub const DEFAULT_CONVERT: &str = "USD";

/// API rate limits
pub const DEFAULT_RATE_LIMIT: u32 = 30; // requests per minute (basic plan)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// Upper bound accepted for `CMC_MAX_RETRIES`
pub const MAX_RETRIES_LIMIT: u32 = 10;
/// Base delay of the exponential backoff between transport retries
pub const RETRY_BASE_DELAY_MS: u64 = 250;

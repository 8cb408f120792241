/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! # cmc-models
//!
//! Data models for CoinMarketCap API responses.
//!
//! Two layers live here:
//!
//! - **Wire models** mirroring the JSON envelopes returned by the ID map and
//!   latest quotes endpoints. Every field the API documents as nullable is an
//!   `Option`, so a `null` never turns into a zero.
//! - **Canonical models** (`ResolutionEntry`, `QuoteRecord`, `PriceQuote`) that
//!   the rest of the workspace passes around and persists.
//!
//! ## Usage
//!
//! ```ignore
//! use cmc_models::{into_records, QuotesResponse};
//!
//! let response: QuotesResponse = serde_json::from_str(&body)?;
//! let records = into_records(response.data)?;
//! ```

#![warn(clippy::all)]

pub mod coin;
pub mod common;
pub mod id_map;
pub mod quotes;

// Re-export common types for convenience
pub use common::*;

// Re-export all model types
pub use coin::*;
pub use id_map::*;
pub use quotes::*;

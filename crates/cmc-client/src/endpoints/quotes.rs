/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Latest market quotes through `/v2/cryptocurrency/quotes/latest`

use super::{EndpointBase, SharedRateLimiter, impl_endpoint_base};
use crate::transport::Transport;
use cmc_core::{Error, ProviderId, Result, types::join_csv};
use cmc_models::{AuxField, QuotesResponse};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Build the query for a batched quotes request
pub fn quotes_params(ids: &[ProviderId], convert: &str, aux: &[AuxField]) -> Vec<(&'static str, String)> {
  let mut params = vec![("id", join_csv(ids)), ("convert", convert.to_string())];
  if !aux.is_empty() {
    params.push(("aux", join_csv(aux)));
  }
  params
}

/// Quotes endpoint
pub struct QuotesEndpoints {
  transport: Arc<Transport>,
  rate_limiter: SharedRateLimiter,
  url: String,
}

impl_endpoint_base!(QuotesEndpoints);

impl QuotesEndpoints {
  /// Create a new quotes endpoint instance
  pub fn new(transport: Arc<Transport>, rate_limiter: SharedRateLimiter, url: String) -> Self {
    Self { transport, rate_limiter, url }
  }

  /// Fetch the latest quotes for `ids` in one request
  ///
  /// # Arguments
  ///
  /// * `ids` - provider ids, sent comma-joined in the given order
  /// * `convert` - reporting currency, e.g. "USD"
  /// * `aux` - auxiliary fields to request on top of the defaults
  ///
  /// # Errors
  ///
  /// An empty id list is rejected as `Error::Config` without a remote call.
  #[instrument(skip(self, ids, aux), fields(count = ids.len()))]
  pub async fn latest(&self, ids: &[ProviderId], convert: &str, aux: &[AuxField]) -> Result<QuotesResponse> {
    if ids.is_empty() {
      return Err(Error::Config("quotes request needs at least one id".to_string()));
    }

    let response: QuotesResponse = self.fetch(&quotes_params(ids, convert, aux)).await?;
    debug!("Quotes endpoint returned {} assets", response.data.len());
    Ok(response)
  }
}

/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

pub mod id_map;
pub mod quotes;

use crate::transport::Transport;
use cmc_core::Result;
use governor::{
  RateLimiter,
  clock::DefaultClock,
  middleware::NoOpMiddleware,
  state::{InMemoryState, NotKeyed},
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Direct (unkeyed) rate limiter shared by every endpoint of one client
pub type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>;

/// Plumbing shared by the endpoint handles.
///
/// Implementors only expose their parts; `fetch` is the single path every
/// request takes, so no endpoint can skip the rate limiter.
pub trait EndpointBase {
  fn transport(&self) -> &Arc<Transport>;

  fn rate_limiter(&self) -> &SharedRateLimiter;

  /// URL this endpoint issues its requests against
  fn url(&self) -> &str;

  /// Block until the shared quota allows another request
  async fn wait_for_rate_limit(&self) -> Result<()> {
    self.rate_limiter().until_ready().await;
    Ok(())
  }

  /// Rate-limited GET against `url()` with `params`, decoded into `T`
  async fn fetch<T: DeserializeOwned>(&self, params: &[(&'static str, String)]) -> Result<T> {
    self.wait_for_rate_limit().await?;
    self.transport().get(self.url(), params).await
  }
}

/// Implement [`EndpointBase`] for a struct with `transport`, `rate_limiter`
/// and `url` fields
macro_rules! impl_endpoint_base {
  ($struct_name:ident) => {
    impl EndpointBase for $struct_name {
      fn transport(&self) -> &Arc<Transport> {
        &self.transport
      }

      fn rate_limiter(&self) -> &SharedRateLimiter {
        &self.rate_limiter
      }

      fn url(&self) -> &str {
        &self.url
      }
    }
  };
}

pub(crate) use impl_endpoint_base;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::endpoints::quotes::QuotesEndpoints;
  use governor::Quota;
  use std::num::NonZeroU32;

  #[tokio::test]
  async fn test_endpoint_base_accessors() {
    let transport = Arc::new(Transport::new_mock());
    let quota = Quota::per_minute(NonZeroU32::new(30).unwrap());
    let rate_limiter = Arc::new(RateLimiter::direct(quota));

    let endpoints =
      QuotesEndpoints::new(transport, rate_limiter, "https://mock.coinmarketcap.com/quotes".to_string());

    assert_eq!(endpoints.url(), "https://mock.coinmarketcap.com/quotes");
    assert!(endpoints.wait_for_rate_limit().await.is_ok());
  }
}

/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

pub mod id_map;
pub mod quote;

pub use id_map::{CmcIdMapRow, NewCmcIdMapRow};
pub use quote::{CoinQuotePriceRow, CoinQuoteRow, NewCoinQuote, NewCoinQuotePrice};

use crate::repository::{RepositoryError, RepositoryResult};
use cmc_core::ProviderId;

/// Provider ids are `u64` upstream and `BIGINT` in the database
pub(crate) fn id_to_db(id: ProviderId) -> RepositoryResult<i64> {
  i64::try_from(id.value())
    .map_err(|_| RepositoryError::Conversion(format!("provider id {} exceeds BIGINT", id)))
}

pub(crate) fn id_from_db(raw: i64) -> RepositoryResult<ProviderId> {
  u64::try_from(raw)
    .map(ProviderId)
    .map_err(|_| RepositoryError::Conversion(format!("negative provider id {}", raw)))
}

/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

use async_trait::async_trait;
use cmc_models::QuoteRecord;
use tracing::{debug, info};

use crate::error::CollectorResult;
use crate::traits::QuoteRepository;

/// Snapshot sink used when persistence is disabled.
///
/// Logs a one-line summary per snapshot and the individual prices at debug.
#[derive(Debug, Clone)]
pub struct LogSink {
  currency: String,
}

impl LogSink {
  pub fn new(currency: impl Into<String>) -> Self {
    Self { currency: currency.into().to_uppercase() }
  }
}

impl Default for LogSink {
  fn default() -> Self {
    Self::new(cmc_core::DEFAULT_CONVERT)
  }
}

#[async_trait]
impl QuoteRepository for LogSink {
  async fn put_quote_snapshot(&self, records: &[QuoteRecord]) -> CollectorResult<usize> {
    let priced = records.iter().filter(|r| r.price(&self.currency).is_some()).count();
    info!("Snapshot of {} records ({} priced in {})", records.len(), priced, self.currency);

    for record in records {
      match record.price(&self.currency) {
        Some(price) => debug!("{} ({}): {:.6} {}", record.symbol, record.id, price, self.currency),
        None => debug!("{} ({}): no {} price", record.symbol, record.id, self.currency),
      }
    }
    Ok(records.len())
  }
}

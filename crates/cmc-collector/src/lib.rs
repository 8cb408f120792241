/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! # cmc-collector
//!
//! Resolves ticker symbols to CoinMarketCap ids and collects quote snapshots
//! for them on a fixed interval.
//!
//! - [`IdResolver`] builds the [`ResolutionStore`] from an ordered list of
//!   tiers: persisted map, remote map endpoint, static table.
//! - [`QuoteCollector`] reads the store through a [`ResolutionView`] and
//!   fetches one batched quote request per call.
//! - [`Scheduler`] runs the collector on a timer and hands each snapshot to a
//!   [`QuoteRepository`].
//!
//! Storage is abstracted behind the traits in [`traits`], so this crate has no
//! database dependency.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cmc_collector::prelude::*;
//!
//! let client = Arc::new(CmcClient::new(Config::from_env()?)?);
//! let resolver = IdResolver::standard(client.clone(), None, &ResolverSettings::default());
//! resolver.resolve(&[]).await?;
//!
//! let collector = QuoteCollector::new(client, resolver.view(), CollectorSettings::default());
//! let mut scheduler = Scheduler::new(Duration::from_secs(60), Arc::new(collector), Arc::new(LogSink::default()))?;
//! scheduler.start()?;
//! ```

pub mod collector;
pub mod error;
pub mod resolver;
pub mod scheduler;
pub mod sinks;
pub mod store;
pub mod traits;

pub use collector::{CollectorSettings, QuoteCollector};
pub use error::{CollectorError, CollectorResult};
pub use resolver::{
  IdResolver, PersistedTier, RemoteTier, ResolutionStrategy, ResolverSettings, StaticTier, STATIC_FALLBACK,
};
pub use scheduler::{CycleStats, Scheduler, SchedulerState};
pub use sinks::LogSink;
pub use store::{ResolutionSnapshot, ResolutionSource, ResolutionStore, ResolutionView};
pub use traits::{QuoteRepository, QuoteSource, ResolutionRepository};

pub mod prelude {
  pub use crate::{
    CollectorError, CollectorResult, CollectorSettings, IdResolver, LogSink, QuoteCollector,
    QuoteRepository, ResolutionRepository, ResolutionSource, ResolverSettings, Scheduler,
  };
  pub use cmc_client::CmcClient;
  pub use cmc_core::{Config, ProviderId, Symbol};
  pub use std::sync::Arc;
  pub use std::time::Duration;
}

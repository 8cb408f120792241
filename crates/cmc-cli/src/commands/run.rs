/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Long-running collection: resolve once, then collect on every tick until
//! SIGINT or SIGTERM.

use anyhow::{Context, Result};
use cmc_collector::{
  CollectorSettings, IdResolver, LogSink, QuoteCollector, QuoteRepository, ResolutionRepository,
  ResolutionSource, Scheduler,
};
use cmc_models::COLLECTOR_AUX_FIELDS;
use std::sync::Arc;
use tracing::{error, info};

use super::{build_client, resolver_settings};
use crate::config::Config;
use crate::persistence::PostgresStore;

pub async fn execute(config: Config) -> Result<()> {
  let client = Arc::new(build_client(&config)?);

  let store = match (&config.database_url, config.use_db) {
    (Some(url), true) => Some(Arc::new(PostgresStore::connect(url).await?)),
    _ => {
      info!("Persistence disabled, snapshots will be logged");
      None
    }
  };

  let resolution_repo = store.clone().map(|s| s as Arc<dyn ResolutionRepository>);
  let resolver = IdResolver::standard(Arc::clone(&client), resolution_repo, &resolver_settings(&config));

  let snapshot = tokio::time::timeout(config.startup_timeout(), resolver.resolve(&config.symbols))
    .await
    .context("Startup resolution timed out")?
    .context("Startup resolution failed")?;
  info!(
    "Tracking {} assets from the {} tier",
    snapshot.len(),
    snapshot.source().map(|s| s.to_string()).unwrap_or_default()
  );

  if let (Some(store), Some(ResolutionSource::Remote)) = (&store, snapshot.source()) {
    if let Err(e) = resolver.persist(&**store).await {
      error!("Failed to persist resolution map: {}", e);
    }
  }

  let collector = QuoteCollector::new(
    client,
    resolver.view(),
    CollectorSettings {
      convert: config.convert.clone(),
      aux: COLLECTOR_AUX_FIELDS.to_vec(),
      fetch_timeout: config.fetch_timeout(),
    },
  );
  let sink: Arc<dyn QuoteRepository> = match store {
    Some(store) => store as Arc<dyn QuoteRepository>,
    None => Arc::new(LogSink::new(config.convert.clone())),
  };

  let mut scheduler = Scheduler::new(config.ticker_interval, Arc::new(collector), sink)?;
  scheduler.start()?;

  shutdown_signal().await?;

  scheduler.stop().await?;
  Ok(())
}

async fn shutdown_signal() -> Result<()> {
  #[cfg(unix)]
  {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
    tokio::select! {
      result = tokio::signal::ctrl_c() => result.context("Failed to install Ctrl+C handler")?,
      _ = terminate.recv() => {}
    }
  }

  #[cfg(not(unix))]
  tokio::signal::ctrl_c().await.context("Failed to install Ctrl+C handler")?;

  info!("Shutdown signal received, stopping collector");
  Ok(())
}

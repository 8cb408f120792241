/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Fixed-interval driver for the quote collector.
//!
//! `Idle -> Running -> Stopped`. Cycles run one at a time on a single
//! background task; a failed or panicking cycle is logged and the loop waits
//! for the next tick.

use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{CollectorError, CollectorResult};
use crate::traits::{QuoteRepository, QuoteSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
  Idle,
  Running,
  Stopped,
}

impl fmt::Display for SchedulerState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SchedulerState::Idle => write!(f, "idle"),
      SchedulerState::Running => write!(f, "running"),
      SchedulerState::Stopped => write!(f, "stopped"),
    }
  }
}

/// Point-in-time copy of the cycle counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
  pub run: u64,
  pub succeeded: u64,
  pub failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
  run: AtomicU64,
  succeeded: AtomicU64,
  failed: AtomicU64,
}

impl Counters {
  fn snapshot(&self) -> CycleStats {
    CycleStats {
      run: self.run.load(Ordering::Relaxed),
      succeeded: self.succeeded.load(Ordering::Relaxed),
      failed: self.failed.load(Ordering::Relaxed),
    }
  }
}

pub struct Scheduler {
  interval: Duration,
  source: Arc<dyn QuoteSource>,
  sink: Arc<dyn QuoteRepository>,
  state: SchedulerState,
  cancel: CancellationToken,
  handle: Option<JoinHandle<()>>,
  counters: Arc<Counters>,
}

impl Scheduler {
  /// `interval` must be non-zero.
  pub fn new(
    interval: Duration,
    source: Arc<dyn QuoteSource>,
    sink: Arc<dyn QuoteRepository>,
  ) -> CollectorResult<Self> {
    if interval.is_zero() {
      return Err(CollectorError::Config("interval must be greater than zero".to_string()));
    }

    Ok(Self {
      interval,
      source,
      sink,
      state: SchedulerState::Idle,
      cancel: CancellationToken::new(),
      handle: None,
      counters: Arc::new(Counters::default()),
    })
  }

  pub fn state(&self) -> SchedulerState {
    self.state
  }

  pub fn interval(&self) -> Duration {
    self.interval
  }

  pub fn stats(&self) -> CycleStats {
    self.counters.snapshot()
  }

  /// Spawn the collection loop. The first cycle fires one interval from now.
  ///
  /// Must be called from within a tokio runtime.
  pub fn start(&mut self) -> CollectorResult<()> {
    if self.state != SchedulerState::Idle {
      return Err(CollectorError::SchedulerState(format!("cannot start a {} scheduler", self.state)));
    }

    let interval = self.interval;
    let source = Arc::clone(&self.source);
    let sink = Arc::clone(&self.sink);
    let counters = Arc::clone(&self.counters);
    let cancel = self.cancel.clone();

    self.handle = Some(tokio::spawn(async move {
      let mut ticker = interval_at(Instant::now() + interval, interval);
      ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

      loop {
        tokio::select! {
          biased;
          _ = cancel.cancelled() => break,
          _ = ticker.tick() => {}
        }

        let cycle = counters.run.fetch_add(1, Ordering::Relaxed) + 1;
        run_cycle(cycle, source.as_ref(), sink.as_ref(), &counters).await;
      }

      debug!("Collection loop exited");
    }));

    self.state = SchedulerState::Running;
    info!("Scheduler started with interval {:?}", interval);
    Ok(())
  }

  /// Signal the loop to stop and wait for it. A cycle already in progress is
  /// allowed to finish.
  pub async fn stop(&mut self) -> CollectorResult<()> {
    if self.state != SchedulerState::Running {
      return Err(CollectorError::SchedulerState(format!("cannot stop a {} scheduler", self.state)));
    }

    self.cancel.cancel();
    if let Some(handle) = self.handle.take() {
      if let Err(e) = handle.await {
        error!("Collection loop ended abnormally: {}", e);
      }
    }

    self.state = SchedulerState::Stopped;
    let stats = self.stats();
    info!(
      "Scheduler stopped after {} cycles ({} succeeded, {} failed)",
      stats.run, stats.succeeded, stats.failed
    );
    Ok(())
  }
}

impl Drop for Scheduler {
  fn drop(&mut self) {
    self.cancel.cancel();
  }
}

async fn run_cycle(cycle: u64, source: &dyn QuoteSource, sink: &dyn QuoteRepository, counters: &Counters) {
  let started = Instant::now();
  let outcome = AssertUnwindSafe(async {
    let records = source.collect().await?;
    sink.put_quote_snapshot(&records).await
  })
  .catch_unwind()
  .await;

  match outcome {
    Ok(Ok(written)) => {
      counters.succeeded.fetch_add(1, Ordering::Relaxed);
      info!("Cycle {} staged {} records in {:?}", cycle, written, started.elapsed());
    }
    Ok(Err(e)) => {
      counters.failed.fetch_add(1, Ordering::Relaxed);
      error!("Cycle {} failed: {}", cycle, e);
    }
    Err(panic) => {
      counters.failed.fetch_add(1, Ordering::Relaxed);
      let message = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
      warn!("Cycle {} panicked: {}", cycle, message);
    }
  }
}

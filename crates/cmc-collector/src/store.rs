/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! In-memory symbol to provider id map.
//!
//! The map is published as an immutable snapshot behind an `Arc`. Publishing
//! swaps the whole snapshot under the write lock, so readers either see the
//! previous map or the new one, never a mix.

use chrono::{DateTime, Utc};
use cmc_core::{ProviderId, Symbol};
use cmc_models::ResolutionEntry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Which tier produced the current map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionSource {
  Persisted,
  Remote,
  Static,
}

impl fmt::Display for ResolutionSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ResolutionSource::Persisted => write!(f, "persisted"),
      ResolutionSource::Remote => write!(f, "remote"),
      ResolutionSource::Static => write!(f, "static"),
    }
  }
}

/// One published version of the map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionSnapshot {
  entries: BTreeMap<Symbol, ResolutionEntry>,
  source: Option<ResolutionSource>,
  resolved_at: Option<DateTime<Utc>>,
}

impl ResolutionSnapshot {
  /// Build a snapshot keyed by symbol.
  ///
  /// When several entries share a symbol the best ranked one is kept;
  /// unranked entries lose to ranked ones and ties keep the first seen.
  pub fn from_entries(entries: Vec<ResolutionEntry>, source: ResolutionSource) -> Self {
    let mut map: BTreeMap<Symbol, ResolutionEntry> = BTreeMap::new();
    for entry in entries {
      match map.get(&entry.symbol) {
        Some(existing) if rank_key(existing) <= rank_key(&entry) => {}
        _ => {
          map.insert(entry.symbol.clone(), entry);
        }
      }
    }
    Self { entries: map, source: Some(source), resolved_at: Some(Utc::now()) }
  }

  pub fn get(&self, symbol: &Symbol) -> Option<&ResolutionEntry> {
    self.entries.get(symbol)
  }

  pub fn id_of(&self, symbol: &Symbol) -> Option<ProviderId> {
    self.entries.get(symbol).map(|entry| entry.id)
  }

  /// Distinct provider ids, ascending
  pub fn ids(&self) -> Vec<ProviderId> {
    let mut ids: Vec<ProviderId> = self.entries.values().map(|entry| entry.id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
  }

  /// Entries ordered by symbol
  pub fn entries(&self) -> impl Iterator<Item = &ResolutionEntry> {
    self.entries.values()
  }

  pub fn to_vec(&self) -> Vec<ResolutionEntry> {
    self.entries.values().cloned().collect()
  }

  pub fn source(&self) -> Option<ResolutionSource> {
    self.source
  }

  pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
    self.resolved_at
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

fn rank_key(entry: &ResolutionEntry) -> (bool, u32) {
  match entry.rank {
    Some(rank) => (false, rank),
    None => (true, 0),
  }
}

type Shared = Arc<RwLock<Arc<ResolutionSnapshot>>>;

/// Publishing handle. Owned by the resolver.
#[derive(Debug, Default)]
pub struct ResolutionStore {
  inner: Shared,
}

impl ResolutionStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Swap in a new snapshot, returning the previous one
  pub fn publish(&self, snapshot: ResolutionSnapshot) -> Arc<ResolutionSnapshot> {
    let next = Arc::new(snapshot);
    let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *guard, next)
  }

  pub fn snapshot(&self) -> Arc<ResolutionSnapshot> {
    read(&self.inner)
  }

  /// Read-only handle for consumers
  pub fn view(&self) -> ResolutionView {
    ResolutionView { inner: Arc::clone(&self.inner) }
  }
}

/// Read-only handle on the store
#[derive(Debug, Clone)]
pub struct ResolutionView {
  inner: Shared,
}

impl ResolutionView {
  pub fn snapshot(&self) -> Arc<ResolutionSnapshot> {
    read(&self.inner)
  }

  pub fn ids(&self) -> Vec<ProviderId> {
    self.snapshot().ids()
  }

  pub fn id_of(&self, symbol: &Symbol) -> Option<ProviderId> {
    self.snapshot().id_of(symbol)
  }

  pub fn is_empty(&self) -> bool {
    self.snapshot().is_empty()
  }
}

fn read(inner: &Shared) -> Arc<ResolutionSnapshot> {
  Arc::clone(&inner.read().unwrap_or_else(PoisonError::into_inner))
}

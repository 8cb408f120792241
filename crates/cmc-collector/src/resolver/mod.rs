/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Symbol to provider id resolution.
//!
//! The resolver walks an ordered list of tiers (persisted store, remote map
//! endpoint, static table) and publishes the first non-empty result.

pub mod service;
pub mod tiers;

pub use service::{IdResolver, ResolverSettings};
pub use tiers::{PersistedTier, RemoteTier, ResolutionStrategy, StaticTier, STATIC_FALLBACK};

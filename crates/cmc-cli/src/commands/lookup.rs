/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

//! Ad-hoc queries against the map endpoint. Nothing is stored.

use anyhow::{Context, Result};
use clap::Args;
use cmc_collector::IdResolver;
use cmc_core::Symbol;
use cmc_models::ResolutionEntry;
use std::sync::Arc;

use super::{build_client, resolver_settings};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct LookupArgs {
  /// Ticker symbol to resolve, e.g. BTC
  pub symbol: String,
}

#[derive(Args, Debug)]
pub struct TopArgs {
  /// Number of assets to list
  #[arg(short, long, default_value_t = 10)]
  pub limit: u32,
}

pub async fn execute_lookup(args: LookupArgs, config: Config) -> Result<()> {
  let symbol = Symbol::new(&args.symbol).with_context(|| format!("Invalid symbol {:?}", args.symbol))?;
  let resolver = ad_hoc_resolver(&config)?;

  let entries = resolver.lookup_symbol(&symbol).await?;
  if entries.is_empty() {
    println!("No CoinMarketCap asset listed under {}", symbol);
  } else {
    print_entries(&entries);
  }
  Ok(())
}

pub async fn execute_top(args: TopArgs, config: Config) -> Result<()> {
  let resolver = ad_hoc_resolver(&config)?;
  let entries = resolver.top_coins(args.limit).await?;
  print_entries(&entries);
  Ok(())
}

fn ad_hoc_resolver(config: &Config) -> Result<IdResolver> {
  let client = Arc::new(build_client(config)?);
  Ok(IdResolver::standard(client, None, &resolver_settings(config)))
}

fn print_entries(entries: &[ResolutionEntry]) {
  println!("{:>6}  {:<10}  {:>8}  {:<28}  {}", "RANK", "SYMBOL", "ID", "NAME", "SLUG");
  for line in entries.iter().map(format_entry) {
    println!("{}", line);
  }
}

fn format_entry(entry: &ResolutionEntry) -> String {
  let rank = entry.rank.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
  format!(
    "{:>6}  {:<10}  {:>8}  {:<28}  {}",
    rank,
    entry.symbol,
    entry.id,
    entry.name.as_deref().unwrap_or("-"),
    entry.slug.as_deref().unwrap_or("-")
  )
}

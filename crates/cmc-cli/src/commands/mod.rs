/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

pub mod lookup;
pub mod run;

use crate::config::Config;
use cmc_client::CmcClient;
use cmc_collector::ResolverSettings;

fn resolver_settings(config: &Config) -> ResolverSettings {
  ResolverSettings { tier_timeout: config.fetch_timeout(), top_limit: config.id_map_limit }
}

fn build_client(config: &Config) -> anyhow::Result<CmcClient> {
  Ok(CmcClient::new(config.api_config.clone())?)
}

/*
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 */

use super::{id_from_db, id_to_db};
use crate::repository::{RepositoryError, RepositoryResult};
use crate::schema::cmc_id_map;
use chrono::{DateTime, Utc};
use cmc_core::Symbol;
use cmc_models::ResolutionEntry;
use diesel::prelude::*;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = cmc_id_map)]
#[diesel(primary_key(symbol))]
pub struct CmcIdMapRow {
  pub symbol: String,
  pub cmc_id: i64,
  pub name: Option<String>,
  pub slug: Option<String>,
  pub cmc_rank: Option<i32>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = cmc_id_map)]
pub struct NewCmcIdMapRow {
  pub symbol: String,
  pub cmc_id: i64,
  pub name: Option<String>,
  pub slug: Option<String>,
  pub cmc_rank: Option<i32>,
  pub updated_at: DateTime<Utc>,
}

impl NewCmcIdMapRow {
  pub fn from_entry(entry: &ResolutionEntry, updated_at: DateTime<Utc>) -> RepositoryResult<Self> {
    let cmc_rank = entry
      .rank
      .map(i32::try_from)
      .transpose()
      .map_err(|_| RepositoryError::Conversion(format!("rank out of range for {}", entry.symbol)))?;

    Ok(Self {
      symbol: entry.symbol.to_string(),
      cmc_id: id_to_db(entry.id)?,
      name: entry.name.clone(),
      slug: entry.slug.clone(),
      cmc_rank,
      updated_at,
    })
  }
}

impl TryFrom<CmcIdMapRow> for ResolutionEntry {
  type Error = RepositoryError;

  fn try_from(row: CmcIdMapRow) -> Result<Self, Self::Error> {
    let symbol = Symbol::new(&row.symbol).map_err(|e| RepositoryError::Conversion(e.to_string()))?;
    Ok(ResolutionEntry {
      symbol,
      id: id_from_db(row.cmc_id)?,
      name: row.name,
      slug: row.slug,
      rank: row.cmc_rank.and_then(|r| u32::try_from(r).ok()),
    })
  }
}

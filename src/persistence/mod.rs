//! CSV Persistence Module
//!
//! Appends the markets of every successful refresh cycle to a CSV file

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::NormalizedMarket;

/// Market snapshot record for CSV storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshotRecord {
    pub timestamp: i64,
    pub id: String,
    pub name: String,
    pub probability: f64,
    pub change24h: f64,
    pub volume: f64,
    pub liquidity: f64,
    pub url: String,
}

impl MarketSnapshotRecord {
    pub fn from_market(market: &NormalizedMarket, at: DateTime<Utc>) -> Self {
        Self {
            timestamp: at.timestamp_millis(),
            id: market.id.clone(),
            name: market.name.clone(),
            probability: market.probability,
            change24h: market.change24h,
            volume: market.volume,
            liquidity: market.liquidity,
            url: market.url.clone(),
        }
    }
}

pub const SNAPSHOT_FILE: &str = "market_snapshots.csv";

pub struct SnapshotWriter {
    path: PathBuf,
    enabled: bool,
}

impl SnapshotWriter {
    pub fn new(data_dir: impl AsRef<Path>, enabled: bool) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        if enabled {
            fs::create_dir_all(data_dir).context("Failed to create data directory")?;
        }
        Ok(Self {
            path: data_dir.join(SNAPSHOT_FILE),
            enabled,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append one row per market; returns the rows written
    pub fn record_cycle(&self, markets: &[NormalizedMarket], at: DateTime<Utc>) -> Result<usize> {
        if !self.enabled || markets.is_empty() {
            return Ok(0);
        }

        let path = &self.path;
        let mut writer = Self::create_writer(path)?;

        for market in markets {
            writer
                .serialize(MarketSnapshotRecord::from_market(market, at))
                .context("Failed to write market snapshot")?;
        }
        writer.flush().context("Failed to flush snapshot writer")?;

        debug!(path = %path.display(), rows = markets.len(), "Market snapshot written");
        Ok(markets.len())
    }

    fn create_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
        let file_has_data =
            path.exists() && fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .context("Failed to open CSV file")?;

        Ok(WriterBuilder::new()
            .has_headers(!file_has_data)
            .from_writer(file))
    }
}

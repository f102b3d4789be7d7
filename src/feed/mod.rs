//! Feed clients for market listings and price history
//!
//! Fetching stays at this edge: everything returned here is raw JSON that
//! the normalizer and chart parsers consume.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::FeedsConfig;

/// Source of raw market and price-history payloads
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Active markets as returned by the listing endpoint
    async fn fetch_markets(&self) -> Result<Value>;

    /// Price history as `{prices: [[timestampMs, price], ...]}`
    async fn fetch_price_history(&self) -> Result<Value>;
}

/// HTTP feed backed by Gamma and a market-chart endpoint
pub struct HttpFeed {
    client: Client,
    gamma_url: String,
    chart_url: String,
    market_query_limit: usize,
}

impl HttpFeed {
    pub fn new(cfg: &FeedsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            gamma_url: cfg.gamma_url.trim_end_matches('/').to_string(),
            chart_url: cfg.chart_url.clone(),
            market_query_limit: cfg.market_query_limit.max(1),
        })
    }

    pub fn markets_url(&self) -> String {
        format!(
            "{}/markets?closed=false&active=true&limit={}",
            self.gamma_url, self.market_query_limit
        )
    }

    async fn get_json(&self, url: &str, what: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {what}"))?;

        if !response.status().is_success() {
            bail!("Failed to get {}: {}", what, response.status());
        }

        let payload: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {what} response"))?;

        debug!(url = %url, "Fetched {}", what);
        Ok(payload)
    }
}

#[async_trait]
impl MarketFeed for HttpFeed {
    async fn fetch_markets(&self) -> Result<Value> {
        let url = self.markets_url();
        self.get_json(&url, "markets").await
    }

    async fn fetch_price_history(&self) -> Result<Value> {
        self.get_json(&self.chart_url, "price history").await
    }
}

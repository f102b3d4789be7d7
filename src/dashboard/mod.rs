//! Dashboard state - refresh cycle with stale retention
//!
//! One cycle fetches and normalizes markets, refreshes the price history
//! when due, and only then commits both. A failed cycle records its error
//! and marks the display stale while the previous good output stays.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::chart::{points_from_market_chart, window, ChartRange, ChartSchedule};
use crate::error::{AssistError, AssistResult};
use crate::feed::MarketFeed;
use crate::polymarket::{decode_market_payload, normalize_batch, NormalizeOptions};
use crate::types::{ChartPoint, ChartWindow, LiveStatus, NormalizedMarket};

pub struct Dashboard {
    opts: NormalizeOptions,
    markets: Vec<NormalizedMarket>,
    chart: Vec<ChartPoint>,
    /// Bundled history used when the chart feed fails
    chart_fallback: Vec<ChartPoint>,
    schedule: ChartSchedule,
    last_update: Option<DateTime<Utc>>,
    last_error: Option<AssistError>,
    status: LiveStatus,
}

impl Dashboard {
    pub fn new(opts: NormalizeOptions, chart_refresh_secs: u64) -> Self {
        Self {
            opts,
            markets: Vec::new(),
            chart: Vec::new(),
            chart_fallback: Vec::new(),
            schedule: ChartSchedule::new(chart_refresh_secs),
            last_update: None,
            last_error: None,
            status: LiveStatus::Sync,
        }
    }

    pub fn with_chart_fallback(mut self, points: Vec<ChartPoint>) -> Self {
        self.chart_fallback = points;
        self
    }

    pub fn markets(&self) -> &[NormalizedMarket] {
        &self.markets
    }

    pub fn chart(&self) -> &[ChartPoint] {
        &self.chart
    }

    pub fn status(&self) -> LiveStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&AssistError> {
        self.last_error.as_ref()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn chart_window(&self, range: ChartRange) -> AssistResult<ChartWindow> {
        window(&self.chart, range.days())
    }

    /// Run one cycle now
    pub async fn refresh(
        &mut self,
        feed: &dyn MarketFeed,
        force_chart: bool,
    ) -> AssistResult<usize> {
        self.refresh_at(feed, force_chart, Utc::now()).await
    }

    /// Run one cycle as of `now`; returns the number of markets shown
    pub async fn refresh_at(
        &mut self,
        feed: &dyn MarketFeed,
        force_chart: bool,
        now: DateTime<Utc>,
    ) -> AssistResult<usize> {
        self.status = LiveStatus::Sync;

        let markets = match self.load_markets(feed).await {
            Ok(markets) => markets,
            Err(e) => {
                warn!(error = %e, kept = self.markets.len(), "Refresh failed, keeping previous data");
                self.status = LiveStatus::Stale;
                self.last_error = Some(e.clone());
                return Err(e);
            }
        };

        if force_chart || self.schedule.needs_refresh(now) {
            if let Some(points) = self.load_chart(feed).await {
                self.chart = points;
            }
            self.schedule.mark_updated(now);
        }

        let count = markets.len();
        self.markets = markets;
        self.last_update = Some(now);
        self.last_error = None;
        self.status = LiveStatus::Live;

        info!(markets = count, chart_points = self.chart.len(), "Refresh complete");
        Ok(count)
    }

    async fn load_markets(&self, feed: &dyn MarketFeed) -> AssistResult<Vec<NormalizedMarket>> {
        let payload = feed
            .fetch_markets()
            .await
            .map_err(|e| AssistError::FeedUnavailable(format!("{e:#}")))?;
        let raws = decode_market_payload(payload)?;
        normalize_batch(raws, &self.opts)
    }

    /// Live history, else the bundled records; `None` keeps the current chart
    async fn load_chart(&self, feed: &dyn MarketFeed) -> Option<Vec<ChartPoint>> {
        let live = match feed.fetch_price_history().await {
            Ok(payload) => points_from_market_chart(&payload),
            Err(e) => Err(AssistError::FeedUnavailable(format!("{e:#}"))),
        };

        let error = match live {
            Ok(points) if !points.is_empty() => return Some(points),
            Ok(_) => AssistError::FeedUnavailable("empty price history".to_string()),
            Err(e) => e,
        };

        if self.chart_fallback.is_empty() {
            warn!(
                error = %error,
                kept_points = self.chart.len(),
                "Price history unavailable and no bundled records, keeping current chart"
            );
            return None;
        }

        warn!(
            error = %error,
            fallback_points = self.chart_fallback.len(),
            "Price history unavailable, using bundled records"
        );
        Some(self.chart_fallback.clone())
    }
}

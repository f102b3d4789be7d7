//! Chart Series Reducer
//!
//! Windows a newest-first price history into an oldest-to-newest slice
//! with price bounds, and maps pointer positions back to samples.

mod sources;

pub use sources::{points_from_market_chart, points_from_records};

use chrono::{DateTime, Duration, Utc};

use crate::error::{AssistError, AssistResult};
use crate::types::{ChartPoint, ChartWindow};

/// Selectable display ranges, in samples (one per day)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartRange {
    Week,
    #[default]
    Month,
    Quarter,
}

impl ChartRange {
    pub fn days(&self) -> usize {
        match self {
            ChartRange::Week => 7,
            ChartRange::Month => 30,
            ChartRange::Quarter => 90,
        }
    }

    pub fn from_days(days: usize) -> Option<Self> {
        match days {
            7 => Some(ChartRange::Week),
            30 => Some(ChartRange::Month),
            90 => Some(ChartRange::Quarter),
            _ => None,
        }
    }
}

impl ChartWindow {
    /// Position of `price` within the bounds, 0 at `min` and 1 at `max`
    pub fn scale(&self, price: f64) -> f64 {
        (price - self.min) / (self.max - self.min)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Take the `range_size` newest points of a newest-first series, oldest first.
///
/// Bounds cover the selected prices; a flat selection gets the unit range
/// `[min, min + 1]` so scaling never divides by zero. An empty series
/// yields an empty window over `[0, 1]`.
pub fn window(series: &[ChartPoint], range_size: usize) -> AssistResult<ChartWindow> {
    if range_size == 0 {
        return Err(AssistError::Domain("chart range must be positive".to_string()));
    }

    let mut points: Vec<ChartPoint> = series.iter().take(range_size).cloned().collect();
    points.reverse();

    let (min, max) = points
        .iter()
        .map(|p| p.price)
        .fold(None, |acc: Option<(f64, f64)>, price| match acc {
            None => Some((price, price)),
            Some((lo, hi)) => Some((lo.min(price), hi.max(price))),
        })
        .unwrap_or((0.0, 1.0));

    let max = if max == min { min + 1.0 } else { max };

    Ok(ChartWindow { points, min, max })
}

/// Sample under a pointer at `fraction` of the chart width.
///
/// The fraction is clamped to [0, 1] and mapped linearly onto the index
/// range, rounding to the closest sample.
pub fn nearest(window: &ChartWindow, fraction: f64) -> Option<&ChartPoint> {
    let last = window.points.len().checked_sub(1)?;
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let index = (fraction * last as f64).round() as usize;
    window.points.get(index.min(last))
}

/// Tracks when the price history was last fetched
#[derive(Debug, Clone)]
pub struct ChartSchedule {
    refresh_interval: Duration,
    last_update: Option<DateTime<Utc>>,
}

impl ChartSchedule {
    pub fn new(refresh_interval_secs: u64) -> Self {
        Self {
            refresh_interval: Duration::seconds(refresh_interval_secs as i64),
            last_update: None,
        }
    }

    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.last_update {
            None => true,
            Some(last) => now.signed_duration_since(last) > self.refresh_interval,
        }
    }

    pub fn mark_updated(&mut self, now: DateTime<Utc>) {
        self.last_update = Some(now);
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }
}

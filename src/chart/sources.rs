//! Price history payloads: live market-chart feed and bundled records

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{AssistError, AssistResult};
use crate::polymarket::raw::number_from_value;
use crate::types::ChartPoint;

/// Parse `{prices: [[timestampMs, price], ...]}` (or the bare array).
///
/// Feed order is oldest first; the result is newest first. Rows without a
/// finite timestamp and price are skipped.
pub fn points_from_market_chart(payload: &Value) -> AssistResult<Vec<ChartPoint>> {
    let rows = payload
        .get("prices")
        .unwrap_or(payload)
        .as_array()
        .ok_or_else(|| AssistError::FeedUnavailable("unexpected price history payload".to_string()))?;

    let mut points: Vec<ChartPoint> = rows.iter().filter_map(point_from_row).collect();
    debug!(rows = rows.len(), points = points.len(), "Parsed price history");

    points.reverse();
    Ok(points)
}

fn point_from_row(row: &Value) -> Option<ChartPoint> {
    let pair = row.as_array()?;
    let timestamp = pair.first().and_then(Value::as_f64).filter(|t| t.is_finite())?;
    let price = pair.get(1).and_then(number_from_value)?;
    let date = DateTime::from_timestamp_millis(timestamp as i64)?;
    Some(ChartPoint {
        date: date.format("%b %d").to_string(),
        price,
    })
}

#[derive(Deserialize)]
struct RecordsDocument {
    #[serde(default)]
    records: Vec<Value>,
}

#[derive(Deserialize)]
struct RecordRow {
    date: String,
    #[serde(alias = "price_end")]
    price: f64,
}

/// Parse the bundled `{records: [{date, price}]}` history, newest first.
///
/// A missing `records` list gives an empty series; malformed rows are skipped.
pub fn points_from_records(payload: &Value) -> Vec<ChartPoint> {
    let Ok(doc) = RecordsDocument::deserialize(payload) else {
        return Vec::new();
    };
    doc.records
        .into_iter()
        .filter_map(|row| serde_json::from_value::<RecordRow>(row).ok())
        .filter(|row| row.price.is_finite())
        .map(|row| ChartPoint {
            date: row.date,
            price: row.price,
        })
        .collect()
}

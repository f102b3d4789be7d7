//! Raw Gamma market records
//!
//! Gamma and its mirrors disagree on field names and on whether numbers and
//! lists arrive natively or JSON-encoded in strings. `RawMarket` accepts all
//! of those shapes and never fails on a bad field: an unreadable value is
//! simply absent.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::error::{AssistError, AssistResult};

/// One market as delivered by the feed, every field optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMarket {
    #[serde(default, deserialize_with = "de_opt_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub condition_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub market_slug: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub event_slug: Option<String>,
    #[serde(default, deserialize_with = "de_event_slugs")]
    pub events: Vec<Option<String>>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub market_url: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub href: Option<String>,

    #[serde(default, deserialize_with = "de_opt_number")]
    pub last_trade_price: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub best_ask: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub best_bid: Option<f64>,
    /// Outcome labels, e.g. `["Yes", "No"]`
    #[serde(default, deserialize_with = "de_text_list")]
    pub outcomes: Vec<String>,
    /// Positional with `outcomes`; unreadable entries are `None`
    #[serde(default, deserialize_with = "de_number_list")]
    pub outcome_prices: Vec<Option<f64>>,

    #[serde(default, deserialize_with = "de_opt_number")]
    pub one_day_price_change: Option<f64>,
    #[serde(default, rename = "priceChange24h", deserialize_with = "de_opt_number")]
    pub price_change_24h: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub one_hour_price_change: Option<f64>,

    #[serde(default, rename = "volume24hr", deserialize_with = "de_opt_number")]
    pub volume_24hr: Option<f64>,
    #[serde(default, rename = "volume24Hour", deserialize_with = "de_opt_number")]
    pub volume_24_hour: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub volume: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub liquidity_clob: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub liquidity: Option<f64>,
}

impl RawMarket {
    /// Slug of the first attached event, if any
    pub fn first_event_slug(&self) -> Option<&str> {
        self.events.first().and_then(|slug| slug.as_deref())
    }
}

/// Split a market payload into raw records.
///
/// Accepts a bare array or an object wrapping the array in `data`.
/// Elements that are not objects are dropped one by one.
pub fn decode_market_payload(payload: Value) -> AssistResult<Vec<RawMarket>> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AssistError::FeedUnavailable(
                    "unexpected market payload".to_string(),
                ))
            }
        },
        _ => {
            return Err(AssistError::FeedUnavailable(
                "unexpected market payload".to_string(),
            ))
        }
    };

    let total = items.len();
    let markets: Vec<RawMarket> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawMarket>(item) {
            Ok(market) => Some(market),
            Err(e) => {
                debug!(error = %e, "Dropping undecodable market record");
                None
            }
        })
        .collect();

    debug!(total, decoded = markets.len(), "Decoded market payload");
    Ok(markets)
}

/// Finite number from a JSON number or numeric string
pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Native array, or a string holding a JSON array; anything else is empty
fn list_from_value(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn de_opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

fn de_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text_from_value))
}

fn de_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value
        .map(list_from_value)
        .unwrap_or_default()
        .iter()
        .map(|item| text_from_value(item).unwrap_or_default())
        .collect())
}

fn de_number_list<'de, D>(deserializer: D) -> Result<Vec<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value
        .map(list_from_value)
        .unwrap_or_default()
        .iter()
        .map(number_from_value)
        .collect())
}

fn de_event_slugs<'de, D>(deserializer: D) -> Result<Vec<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    let events = match value {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    Ok(events
        .iter()
        .map(|event| event.get("slug").and_then(text_from_value))
        .collect())
}

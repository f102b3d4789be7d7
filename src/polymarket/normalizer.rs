//! Market Normalizer - raw feed records to `NormalizedMarket`
//!
//! This is the single place where feed data is coerced. A record either
//! yields a complete `NormalizedMarket` or is dropped; nothing downstream
//! sees a partially populated market.

use tracing::{debug, info};

use super::raw::RawMarket;
use crate::error::{AssistError, AssistResult};
use crate::types::NormalizedMarket;

pub const DEFAULT_SITE_ORIGIN: &str = "https://polymarket.com";
pub const DEFAULT_TOP_N: usize = 6;

/// Options for batch normalization
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Markets kept after sorting by volume
    pub top_n: usize,
    /// Origin used to absolutize relative URLs
    pub site_origin: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
        }
    }
}

impl NormalizeOptions {
    fn origin(&self) -> &str {
        self.site_origin.trim_end_matches('/')
    }
}

/// Normalize one raw record; `None` when no probability or name is derivable
pub fn normalize_market(raw: &RawMarket, opts: &NormalizeOptions) -> Option<NormalizedMarket> {
    let yes_index = yes_outcome_index(&raw.outcomes);
    let outcome_price = |idx: usize| raw.outcome_prices.get(idx).copied().flatten();

    let candidate = first_number([
        raw.last_trade_price,
        raw.best_ask,
        raw.best_bid,
        outcome_price(yes_index),
        outcome_price(0),
    ]);
    let Some(probability) = candidate.and_then(normalize_probability) else {
        debug!(id = ?raw.id, "Dropping market without usable probability");
        return None;
    };

    let Some(name) = first_text([&raw.question, &raw.title, &raw.slug]) else {
        debug!(id = ?raw.id, "Dropping market without name");
        return None;
    };

    let change24h = first_number([
        raw.one_day_price_change,
        raw.price_change_24h,
        raw.one_hour_price_change,
    ])
    .map(normalize_change)
    .unwrap_or(0.0);

    let volume = first_number([raw.volume_24hr, raw.volume_24_hour, raw.volume]).unwrap_or(0.0);
    let liquidity = first_number([raw.liquidity_clob, raw.liquidity]).unwrap_or(0.0);

    let id = first_text([&raw.id, &raw.condition_id, &raw.slug]).unwrap_or_else(|| name.clone());
    let url = resolve_market_url(raw, &name, opts.origin());

    Some(NormalizedMarket {
        id,
        slug: raw.slug.clone().unwrap_or_default(),
        url,
        probability,
        change24h,
        volume,
        liquidity,
        name,
    })
}

/// Normalize a batch: drop rejects, sort by volume descending, keep top N.
///
/// Fails with `NoUsableRecords` when nothing survives, so callers can tell
/// an unusable feed apart from a feed that merely returned few markets.
pub fn normalize_batch<I>(raws: I, opts: &NormalizeOptions) -> AssistResult<Vec<NormalizedMarket>>
where
    I: IntoIterator<Item = RawMarket>,
{
    let mut received = 0usize;
    let mut markets: Vec<NormalizedMarket> = raws
        .into_iter()
        .inspect(|_| received += 1)
        .filter_map(|raw| normalize_market(&raw, opts))
        .collect();

    let usable = markets.len();
    markets.sort_by(|a, b| b.volume.total_cmp(&a.volume));
    markets.truncate(opts.top_n);

    if markets.is_empty() {
        return Err(AssistError::NoUsableRecords);
    }

    info!(
        received,
        usable,
        kept = markets.len(),
        "Normalized market batch"
    );
    Ok(markets)
}

/// Index of the "yes" outcome, 0 when there is none
fn yes_outcome_index(outcomes: &[String]) -> usize {
    outcomes
        .iter()
        .position(|outcome| outcome.trim().eq_ignore_ascii_case("yes"))
        .unwrap_or(0)
}

fn first_number<const N: usize>(candidates: [Option<f64>; N]) -> Option<f64> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| value.is_finite())
}

fn first_text<const N: usize>(candidates: [&Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .filter_map(|value| value.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Percent readings (> 1) are scaled down; negatives are rejected
pub fn normalize_probability(value: f64) -> Option<f64> {
    if value > 1.0 {
        return Some((value / 100.0).clamp(0.0, 1.0));
    }
    if value < 0.0 {
        return None;
    }
    Some(value.clamp(0.0, 1.0))
}

/// Magnitudes above 1 are percentages
pub fn normalize_change(value: f64) -> f64 {
    let scaled = if value.abs() > 1.0 {
        value / 100.0
    } else {
        value
    };
    scaled.clamp(-1.0, 1.0)
}

fn resolve_market_url(raw: &RawMarket, name: &str, origin: &str) -> String {
    let direct = first_text([&raw.url, &raw.market_url, &raw.href])
        .and_then(|value| absolutize_url(&value, origin));
    if let Some(url) = direct {
        return url;
    }

    let first_event = raw.first_event_slug().map(str::to_string);
    if let Some(slug) = first_text([&raw.event_slug, &first_event]) {
        return format!("{origin}/event/{slug}");
    }

    if let Some(slug) = first_text([&raw.slug, &raw.market_slug]) {
        return format!("{origin}/event/{slug}");
    }

    let query: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("{origin}/?search={query}")
}

fn absolutize_url(value: &str, origin: &str) -> Option<String> {
    if value.starts_with("https://") || value.starts_with("http://") {
        return Some(value.to_string());
    }
    if value.starts_with('/') {
        return Some(format!("{origin}{value}"));
    }
    None
}

//! Core types used throughout PolyAssist
//!
//! Canonical market records, base-rate statistics, signals and chart points.
//! Every value here is immutable once built by its pipeline stage.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical market record produced by the normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMarket {
    /// Market identifier (never empty)
    pub id: String,
    /// Display name (never empty)
    pub name: String,
    pub slug: String,
    /// Absolute market URL
    pub url: String,
    /// YES probability in [0, 1]
    pub probability: f64,
    /// 24h change as a fraction in [-1, 1]
    pub change24h: f64,
    pub volume: f64,
    pub liquidity: f64,
}

/// Rate observed in one speaking context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextStat {
    pub rate: f64,
    pub mentions: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseRateContexts {
    pub regular: ContextStat,
    pub focused: ContextStat,
}

/// Historical frequency of a keyword being mentioned
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseRateStat {
    pub base_rate: f64,
    #[serde(default)]
    pub mentions: u32,
    #[serde(default)]
    pub total_events: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contexts: Option<BaseRateContexts>,
}

/// A known speaker and the keywords tracked for them.
///
/// Keyword order is the declared order of the source document and decides
/// which keyword wins when several appear in the same text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerKeywordRecord {
    pub name: String,
    #[serde(default)]
    pub keywords: IndexMap<String, BaseRateStat>,
}

/// Outcome of scanning text for a speaker and keyword
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    NoMatch,
    SpeakerOnly {
        speaker: String,
    },
    SpeakerAndKeyword {
        speaker: String,
        keyword: String,
        stat: BaseRateStat,
    },
}

impl MatchResult {
    pub fn speaker(&self) -> Option<&str> {
        match self {
            MatchResult::NoMatch => None,
            MatchResult::SpeakerOnly { speaker } => Some(speaker),
            MatchResult::SpeakerAndKeyword { speaker, .. } => Some(speaker),
        }
    }

    pub fn is_match(&self) -> bool {
        !matches!(self, MatchResult::NoMatch)
    }
}

/// Recommended side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Yes,
    No,
    Hold,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Yes => write!(f, "YES"),
            Direction::No => write!(f, "NO"),
            Direction::Hold => write!(f, "HOLD"),
        }
    }
}

/// Edge classification.
///
/// `Low` means the gap between reference and market is wide (a strong,
/// high-confidence edge), not that the position carries little financial
/// risk. `High` means the edge is thin. Downstream displays rely on these
/// exact labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBucket {
    Low,
    Medium,
    High,
}

const EDGE_PRECISION: f64 = 1e9;

impl RiskBucket {
    /// Bucket an absolute edge: >= 0.20 Low, >= 0.10 Medium, else High.
    ///
    /// The magnitude is snapped to 1e-9 first so a difference like
    /// `0.6 - 0.5` lands on its boundary.
    pub fn from_edge(edge: f64) -> Self {
        let magnitude = (edge.abs() * EDGE_PRECISION).round() / EDGE_PRECISION;
        if magnitude >= 0.20 {
            RiskBucket::Low
        } else if magnitude >= 0.10 {
            RiskBucket::Medium
        } else {
            RiskBucket::High
        }
    }
}

impl fmt::Display for RiskBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskBucket::Low => write!(f, "LOW"),
            RiskBucket::Medium => write!(f, "MEDIUM"),
            RiskBucket::High => write!(f, "HIGH"),
        }
    }
}

/// One labelled line of a signal breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEntry {
    pub label: String,
    pub value: String,
}

impl SignalEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Directional recommendation derived from base rate vs market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySignal {
    pub direction: Direction,
    /// Always within [0.4, 0.92]
    pub confidence: f64,
    pub risk: RiskBucket,
    /// Base rate minus current probability (0 when unavailable)
    pub edge: f64,
    pub signals: Vec<SignalEntry>,
}

/// Expected value and Kelly sizing for one stake
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskCalculation {
    pub payout_multiple: f64,
    pub win_amount: f64,
    pub expected_value: f64,
    /// Optimal bankroll fraction in percent, floored at 0
    pub kelly_percent: f64,
    pub edge: f64,
    pub risk: RiskBucket,
}

/// One sample of a price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub price: f64,
}

/// Oldest-to-newest slice of a series with its price bounds
#[derive(Debug, Clone, PartialEq)]
pub struct ChartWindow {
    pub points: Vec<ChartPoint>,
    pub min: f64,
    pub max: f64,
}

/// Health of the last refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiveStatus {
    Sync,
    Live,
    Stale,
}

impl fmt::Display for LiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiveStatus::Sync => write!(f, "SYNC"),
            LiveStatus::Live => write!(f, "LIVE"),
            LiveStatus::Stale => write!(f, "STALE"),
        }
    }
}

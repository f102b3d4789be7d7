//! Base-rate analysis for a matched market page

use serde::Serialize;
use std::fmt;

use super::{evaluate_with_momentum, format_gap, SignalConfig};
use crate::types::{BaseRateStat, Direction, MatchResult, StrategySignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    Underpriced,
    Overpriced,
    FairlyPriced,
    /// No current market price was detected
    Unavailable,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Underpriced => write!(f, "Underpriced - Good YES bet"),
            Recommendation::Overpriced => write!(f, "Overpriced - Good NO bet"),
            Recommendation::FairlyPriced => write!(f, "Fairly priced"),
            Recommendation::Unavailable => write!(f, "Could not detect current market price"),
        }
    }
}

/// Everything a base-rate panel shows for one speaker/keyword market
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseRateAnalysis {
    pub speaker: String,
    pub keyword: String,
    pub stat: BaseRateStat,
    pub current_probability: Option<f64>,
    pub gap: Option<f64>,
    pub signal: StrategySignal,
    pub recommendation: Recommendation,
}

impl BaseRateAnalysis {
    pub fn gap_display(&self) -> String {
        format_gap(self.gap)
    }
}

/// Analyze a full speaker+keyword match; other match kinds have nothing to show
pub fn analyze(
    matched: &MatchResult,
    current_probability: Option<f64>,
    cfg: &SignalConfig,
) -> Option<BaseRateAnalysis> {
    let MatchResult::SpeakerAndKeyword {
        speaker,
        keyword,
        stat,
    } = matched
    else {
        return None;
    };

    let signal = evaluate_with_momentum(Some(stat.base_rate), current_probability, cfg, None);
    let recommendation = match (current_probability, signal.direction) {
        (None, _) => Recommendation::Unavailable,
        (Some(_), Direction::Yes) => Recommendation::Underpriced,
        (Some(_), Direction::No) => Recommendation::Overpriced,
        (Some(_), Direction::Hold) => Recommendation::FairlyPriced,
    };

    Some(BaseRateAnalysis {
        speaker: speaker.clone(),
        keyword: keyword.clone(),
        stat: *stat,
        current_probability,
        gap: current_probability.map(|p| stat.base_rate - p),
        signal,
        recommendation,
    })
}

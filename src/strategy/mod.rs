//! Strategy Signal Engine
//!
//! Compares a reference base rate with the market-implied probability and
//! emits a directional recommendation. The gap threshold arrives through
//! `SignalConfig` on every call; nothing here reads global settings.

pub mod analysis;
pub mod filter;

pub use analysis::{analyze, BaseRateAnalysis, Recommendation};
pub use filter::{MarketFilter, HIGH_LIQUIDITY_THRESHOLD};

use crate::types::{Direction, RiskBucket, SignalEntry, StrategySignal};

pub const DEFAULT_MIN_GAP: f64 = 0.15;
pub const DEFAULT_MOMENTUM_STEP: f64 = 0.10;

const BASE_CONFIDENCE: f64 = 0.55;
const DIRECTIONAL_BONUS: f64 = 0.20;
const MIN_CONFIDENCE: f64 = 0.40;
const MAX_CONFIDENCE: f64 = 0.92;

pub const GAP_LABEL: &str = "Probability gap";
pub const PRICE_LABEL: &str = "Current price";
pub const MOMENTUM_LABEL: &str = "Momentum";
const UNAVAILABLE: &str = "unavailable";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalConfig {
    /// Gap beyond which a side is recommended
    pub min_gap: f64,
    /// Confidence shift applied for a momentum reading
    pub momentum_step: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            min_gap: DEFAULT_MIN_GAP,
            momentum_step: DEFAULT_MOMENTUM_STEP,
        }
    }
}

impl SignalConfig {
    pub fn with_min_gap(min_gap: f64) -> Self {
        Self {
            min_gap,
            ..Self::default()
        }
    }
}

/// Momentum reading supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Momentum {
    Supporting,
    Opposing,
}

/// Evaluate without a momentum reading
pub fn evaluate(
    base_rate: Option<f64>,
    current_probability: Option<f64>,
    min_gap: f64,
) -> StrategySignal {
    evaluate_with_momentum(
        base_rate,
        current_probability,
        &SignalConfig::with_min_gap(min_gap),
        None,
    )
}

pub fn evaluate_with_momentum(
    base_rate: Option<f64>,
    current_probability: Option<f64>,
    cfg: &SignalConfig,
    momentum: Option<Momentum>,
) -> StrategySignal {
    let (Some(base_rate), Some(current)) = (base_rate, current_probability) else {
        return StrategySignal {
            direction: Direction::Hold,
            confidence: 0.5,
            risk: RiskBucket::Medium,
            edge: 0.0,
            signals: vec![
                SignalEntry::new(GAP_LABEL, UNAVAILABLE),
                SignalEntry::new(PRICE_LABEL, UNAVAILABLE),
            ],
        };
    };

    let gap = base_rate - current;
    let direction = if gap > cfg.min_gap {
        Direction::Yes
    } else if gap < -cfg.min_gap {
        Direction::No
    } else {
        Direction::Hold
    };

    let mut confidence = BASE_CONFIDENCE;
    if direction != Direction::Hold {
        confidence += DIRECTIONAL_BONUS;
    }

    let mut signals = vec![
        SignalEntry::new(GAP_LABEL, format_gap(Some(gap))),
        SignalEntry::new(PRICE_LABEL, format_percent(current)),
    ];

    match momentum {
        Some(Momentum::Supporting) => {
            confidence += cfg.momentum_step;
            signals.push(SignalEntry::new(MOMENTUM_LABEL, "supporting"));
        }
        Some(Momentum::Opposing) => {
            confidence -= cfg.momentum_step;
            signals.push(SignalEntry::new(MOMENTUM_LABEL, "opposing"));
        }
        None => {}
    }

    StrategySignal {
        direction,
        confidence: confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
        risk: RiskBucket::from_edge(gap),
        edge: gap,
        signals,
    }
}

/// Signed percentage with one decimal, e.g. `+23.0%`; `N/A` when absent
pub fn format_gap(gap: Option<f64>) -> String {
    match gap {
        Some(gap) => {
            let sign = if gap > 0.0 { "+" } else { "" };
            format!("{sign}{:.1}%", gap * 100.0)
        }
        None => "N/A".to_string(),
    }
}

pub fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_holds_with_placeholders() {
        for (base, current) in [(None, Some(0.4)), (Some(0.6), None), (None, None)] {
            let signal = evaluate(base, current, 0.15);
            assert_eq!(signal.direction, Direction::Hold);
            assert_eq!(signal.confidence, 0.5);
            assert_eq!(signal.risk, RiskBucket::Medium);
            assert_eq!(signal.edge, 0.0);
            assert!(signal.signals.iter().all(|s| s.value == "unavailable"));
        }
    }

    #[test]
    fn underpriced_market_recommends_yes() {
        let signal = evaluate(Some(0.63), Some(0.40), 0.15);
        assert_eq!(signal.direction, Direction::Yes);
        assert!((signal.edge - 0.23).abs() < 1e-9);
        assert_eq!(signal.risk, RiskBucket::Low);
        assert!((signal.confidence - 0.75).abs() < 1e-9);
        assert_eq!(signal.signals[0], SignalEntry::new(GAP_LABEL, "+23.0%"));
        assert_eq!(signal.signals[1], SignalEntry::new(PRICE_LABEL, "40.0%"));
    }

    #[test]
    fn overpriced_market_recommends_no() {
        let signal = evaluate(Some(0.20), Some(0.38), 0.15);
        assert_eq!(signal.direction, Direction::No);
        assert_eq!(signal.risk, RiskBucket::Medium);
        assert_eq!(signal.signals[0].value, "-18.0%");
    }

    #[test]
    fn gap_equal_to_threshold_holds() {
        let signal = evaluate(Some(0.5), Some(0.5), 0.0);
        assert_eq!(signal.direction, Direction::Hold);
        assert_eq!(signal.risk, RiskBucket::High);
        assert!((signal.confidence - 0.55).abs() < 1e-9);
        assert_eq!(signal.signals[0].value, "0.0%");
    }

    #[test]
    fn momentum_shifts_confidence_within_bounds() {
        let cfg = SignalConfig::default();
        let up = evaluate_with_momentum(Some(0.9), Some(0.3), &cfg, Some(Momentum::Supporting));
        assert!((up.confidence - 0.85).abs() < 1e-9);
        assert_eq!(up.signals.len(), 3);

        let strong = SignalConfig {
            momentum_step: 0.5,
            ..cfg
        };
        let capped = evaluate_with_momentum(Some(0.9), Some(0.3), &strong, Some(Momentum::Supporting));
        assert_eq!(capped.confidence, 0.92);

        let floored = evaluate_with_momentum(Some(0.5), Some(0.5), &strong, Some(Momentum::Opposing));
        assert_eq!(floored.confidence, 0.4);
    }

    #[test]
    fn direction_and_confidence_hold_across_grid() {
        let steps: Vec<f64> = (0..=20).map(|i| i as f64 / 20.0).collect();
        for &base in &steps {
            for &current in &steps {
                for min_gap in [0.0, 0.05, 0.15, 0.3] {
                    let signal = evaluate(Some(base), Some(current), min_gap);
                    let gap = base - current;
                    let expected = if gap > min_gap {
                        Direction::Yes
                    } else if gap < -min_gap {
                        Direction::No
                    } else {
                        Direction::Hold
                    };
                    assert_eq!(signal.direction, expected);
                    assert!((0.4..=0.92).contains(&signal.confidence));
                }
            }
        }
    }
}

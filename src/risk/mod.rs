//! Risk/Kelly Calculator - expected value and position sizing
//!
//! Implements:
//! - Payout and expected value for a binary share bought at `price`
//! - Full-Kelly fraction, floored at zero (no short sizing)
//! - Edge bucketing shared with the signal engine
//! - Exposure limits for a portfolio of open positions

pub mod exposure;

pub use exposure::{
    assess_exposure, ExposureLevel, ExposureLimits, ExposureReport, OpenPosition,
    PositionExposure,
};

use crate::error::{AssistError, AssistResult};
use crate::types::{RiskBucket, RiskCalculation};

/// Expected value and Kelly sizing for staking `investment` at `price`.
///
/// Rejects non-finite input, probability or price outside (0, 1], a
/// non-positive stake, and prices whose payout multiple is 1 (nothing to
/// win), instead of dividing by zero.
pub fn compute_risk(probability: f64, price: f64, investment: f64) -> AssistResult<RiskCalculation> {
    if !probability.is_finite() || !price.is_finite() || !investment.is_finite() {
        return Err(AssistError::Domain("inputs must be finite".to_string()));
    }
    if probability <= 0.0 || probability > 1.0 {
        return Err(AssistError::Domain(format!(
            "probability {probability} outside (0, 1]"
        )));
    }
    if price <= 0.0 || price > 1.0 {
        return Err(AssistError::Domain(format!("price {price} outside (0, 1]")));
    }
    if investment <= 0.0 {
        return Err(AssistError::Domain(format!(
            "investment {investment} must be positive"
        )));
    }

    let payout_multiple = 1.0 / price;
    let net_odds = payout_multiple - 1.0;
    if net_odds <= 0.0 {
        return Err(AssistError::Domain(format!(
            "price {price} leaves no payout"
        )));
    }

    let win_amount = investment * net_odds;
    let expected_value = probability * win_amount - (1.0 - probability) * investment;

    let kelly_fraction = (probability * payout_multiple - 1.0) / net_odds;
    let kelly_percent = kelly_fraction.max(0.0) * 100.0;

    let edge = probability - price;

    Ok(RiskCalculation {
        payout_multiple,
        win_amount,
        expected_value,
        kelly_percent,
        edge,
        risk: RiskBucket::from_edge(edge),
    })
}

/// Kelly stake capped at the single-position limit of the bankroll
pub fn suggested_stake(
    bankroll: f64,
    kelly_percent: f64,
    limits: &ExposureLimits,
) -> AssistResult<f64> {
    if !bankroll.is_finite() || bankroll <= 0.0 {
        return Err(AssistError::Domain(format!(
            "bankroll {bankroll} must be positive"
        )));
    }
    let kelly_stake = bankroll * kelly_percent.max(0.0) / 100.0;
    Ok(kelly_stake.min(bankroll * limits.single_position_max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_money_with_edge() {
        let r = compute_risk(0.60, 0.50, 100.0).unwrap();
        assert!((r.payout_multiple - 2.0).abs() < 1e-12);
        assert!((r.win_amount - 100.0).abs() < 1e-9);
        assert!((r.expected_value - 20.0).abs() < 1e-9);
        assert!((r.kelly_percent - 20.0).abs() < 1e-9);
        assert_eq!(r.risk, RiskBucket::Medium);
    }

    #[test]
    fn kelly_zero_when_negative_edge() {
        let r = compute_risk(0.45, 0.50, 10.0).unwrap();
        assert_eq!(r.kelly_percent, 0.0);
        assert!(r.expected_value < 0.0);
        assert_eq!(r.risk, RiskBucket::High);
    }

    #[test]
    fn degenerate_prices_are_rejected() {
        assert!(matches!(compute_risk(0.5, 0.0, 10.0), Err(AssistError::Domain(_))));
        assert!(matches!(compute_risk(0.5, 1.0, 10.0), Err(AssistError::Domain(_))));
        assert!(matches!(compute_risk(0.5, 1.2, 10.0), Err(AssistError::Domain(_))));
        assert!(matches!(compute_risk(0.5, f64::NAN, 10.0), Err(AssistError::Domain(_))));
    }

    #[test]
    fn invalid_probability_or_stake_is_rejected() {
        assert!(compute_risk(0.0, 0.5, 10.0).is_err());
        assert!(compute_risk(1.1, 0.5, 10.0).is_err());
        assert!(compute_risk(0.5, 0.5, 0.0).is_err());
        assert!(compute_risk(0.5, 0.5, -5.0).is_err());
    }

    #[test]
    fn expected_value_matches_formula_across_grid() {
        for p in 1..20 {
            for q in 1..20 {
                let probability = p as f64 / 20.0;
                let price = q as f64 / 20.0;
                let r = compute_risk(probability, price, 50.0).unwrap();
                assert!(r.kelly_percent >= 0.0);
                assert_eq!(
                    r.expected_value,
                    probability * r.win_amount - (1.0 - probability) * 50.0
                );
            }
        }
    }

    #[test]
    fn stake_is_capped_by_single_position_limit() {
        let limits = ExposureLimits::default();
        let stake = suggested_stake(1_000.0, 20.0, &limits).unwrap();
        assert!((stake - 50.0).abs() < 1e-9);

        let stake = suggested_stake(1_000.0, 2.0, &limits).unwrap();
        assert!((stake - 20.0).abs() < 1e-9);

        assert!(suggested_stake(0.0, 2.0, &limits).is_err());
    }
}

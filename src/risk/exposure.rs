//! Portfolio exposure against configured limits

use serde::Serialize;

use crate::error::{AssistError, AssistResult};

pub const DEFAULT_SINGLE_POSITION_MAX: f64 = 0.05;
pub const DEFAULT_TOTAL_EXPOSURE_MAX: f64 = 0.15;

/// Share of a limit at which a position is flagged as a warning
const WARNING_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureLimits {
    /// Max fraction of balance in one position
    pub single_position_max: f64,
    /// Max fraction of balance across all positions
    pub total_exposure_max: f64,
}

impl Default for ExposureLimits {
    fn default() -> Self {
        Self {
            single_position_max: DEFAULT_SINGLE_POSITION_MAX,
            total_exposure_max: DEFAULT_TOTAL_EXPOSURE_MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExposureLevel {
    Safe,
    Warning,
    Danger,
}

impl ExposureLevel {
    fn classify(ratio: f64, limit: f64) -> Self {
        if ratio > limit {
            ExposureLevel::Danger
        } else if ratio >= limit * WARNING_RATIO {
            ExposureLevel::Warning
        } else {
            ExposureLevel::Safe
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenPosition {
    pub name: String,
    /// Amount at stake (USDC)
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionExposure {
    pub name: String,
    pub amount: f64,
    pub ratio: f64,
    pub level: ExposureLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureReport {
    pub balance: f64,
    pub total_exposure: f64,
    pub exposure_ratio: f64,
    pub level: ExposureLevel,
    pub positions: Vec<PositionExposure>,
}

impl ExposureReport {
    /// Positions beyond the single-position limit
    pub fn breaches(&self) -> impl Iterator<Item = &PositionExposure> {
        self.positions
            .iter()
            .filter(|p| p.level == ExposureLevel::Danger)
    }
}

pub fn assess_exposure(
    balance: f64,
    positions: &[OpenPosition],
    limits: &ExposureLimits,
) -> AssistResult<ExposureReport> {
    if !balance.is_finite() || balance <= 0.0 {
        return Err(AssistError::Domain(format!(
            "balance {balance} must be positive"
        )));
    }

    let positions: Vec<PositionExposure> = positions
        .iter()
        .map(|p| {
            let ratio = p.amount / balance;
            PositionExposure {
                name: p.name.clone(),
                amount: p.amount,
                ratio,
                level: ExposureLevel::classify(ratio, limits.single_position_max),
            }
        })
        .collect();

    let total_exposure: f64 = positions.iter().map(|p| p.amount).sum();
    let exposure_ratio = total_exposure / balance;

    Ok(ExposureReport {
        balance,
        total_exposure,
        exposure_ratio,
        level: ExposureLevel::classify(exposure_ratio, limits.total_exposure_max),
        positions,
    })
}

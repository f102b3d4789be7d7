//! Conversions from config sections into the value structs the pipeline takes

use super::{AppConfig, MarketsConfig, RiskConfig, StrategyConfig};
use crate::chart::ChartRange;
use crate::polymarket::NormalizeOptions;
use crate::risk::ExposureLimits;
use crate::strategy::SignalConfig;

impl From<&MarketsConfig> for NormalizeOptions {
    fn from(cfg: &MarketsConfig) -> Self {
        Self {
            top_n: cfg.top_n,
            site_origin: cfg.site_origin.clone(),
        }
    }
}

impl From<&StrategyConfig> for SignalConfig {
    fn from(cfg: &StrategyConfig) -> Self {
        Self {
            min_gap: cfg.min_gap,
            momentum_step: cfg.momentum_step,
        }
    }
}

impl From<&RiskConfig> for ExposureLimits {
    fn from(cfg: &RiskConfig) -> Self {
        Self {
            single_position_max: cfg.single_position_max,
            total_exposure_max: cfg.total_exposure_max,
        }
    }
}

impl AppConfig {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions::from(&self.markets)
    }

    pub fn signal_config(&self) -> SignalConfig {
        SignalConfig::from(&self.strategy)
    }

    pub fn exposure_limits(&self) -> ExposureLimits {
        ExposureLimits::from(&self.risk)
    }

    pub fn chart_range(&self) -> Option<ChartRange> {
        ChartRange::from_days(self.chart.range)
    }
}

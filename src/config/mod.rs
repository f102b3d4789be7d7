//! Configuration management for PolyAssist
//!
//! Loads from config files + environment variables via .env

mod types;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub feeds: FeedsConfig,
    pub refresh: RefreshConfig,
    pub markets: MarketsConfig,
    pub strategy: StrategyConfig,
    pub risk: RiskConfig,
    pub chart: ChartConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedsConfig {
    /// Gamma API endpoint
    pub gamma_url: String,
    /// Markets requested per refresh
    pub market_query_limit: usize,
    /// Market-chart endpoint returning `{prices: [[ts, price]]}`
    pub chart_url: String,
    /// HTTP timeout in seconds
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Full pipeline cycle interval in seconds
    pub update_interval_secs: u64,
    /// Minimum age of the price history before refetching, in seconds
    pub chart_refresh_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketsConfig {
    /// Markets kept after sorting by volume
    pub top_n: usize,
    /// Origin for relative market URLs
    pub site_origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    /// Minimum |base rate - market| gap for a YES/NO call
    pub min_gap: f64,
    /// Confidence shift for a momentum reading
    pub momentum_step: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    /// Max fraction of balance in one position
    pub single_position_max: f64,
    /// Max fraction of balance across positions
    pub total_exposure_max: f64,
    /// Stake used when none is given (USDC)
    pub default_investment: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    /// Samples shown: 7, 30 or 90
    pub range: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Data directory for CSV snapshots
    pub dir: String,
    /// Enable market snapshot CSV
    pub csv_enabled: bool,
    /// Speaker/keyword reference dataset
    pub speakers_path: String,
    /// Bundled price history used when the chart feed fails
    pub chart_fallback_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines
    pub json: bool,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (POLYASSIST__*)
            .add_source(Environment::with_prefix("POLYASSIST").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// Compiled-in defaults only
    pub fn defaults() -> Result<Self> {
        let config = Self::builder()?
            .build()
            .context("Failed to build configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    fn builder() -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            // Feed defaults
            .set_default("feeds.gamma_url", "https://gamma-api.polymarket.com")?
            .set_default("feeds.market_query_limit", 50)?
            .set_default(
                "feeds.chart_url",
                "https://api.coingecko.com/api/v3/coins/ethereum/market_chart?vs_currency=usd&days=90&interval=daily",
            )?
            .set_default("feeds.request_timeout_secs", 15)?
            // Refresh defaults
            .set_default("refresh.update_interval_secs", 30)?
            .set_default("refresh.chart_refresh_secs", 600)?
            // Market defaults
            .set_default("markets.top_n", 6)?
            .set_default("markets.site_origin", "https://polymarket.com")?
            // Strategy defaults
            .set_default("strategy.min_gap", 0.15)?
            .set_default("strategy.momentum_step", 0.10)?
            // Risk defaults
            .set_default("risk.single_position_max", 0.05)?
            .set_default("risk.total_exposure_max", 0.15)?
            .set_default("risk.default_investment", 100.0)?
            // Chart defaults
            .set_default("chart.range", 30)?
            // Data defaults
            .set_default("data.dir", "./data")?
            .set_default("data.csv_enabled", true)?
            .set_default("data.speakers_path", "data/speakers.json")?
            .set_default("data.chart_fallback_path", "data/eth_historical.json")?
            // Logging defaults
            .set_default("logging.json", false)?)
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.markets.top_n == 0 {
            bail!("markets.top_n must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.strategy.min_gap) {
            bail!("strategy.min_gap must be within [0, 1]");
        }
        if self.refresh.update_interval_secs == 0 {
            bail!("refresh.update_interval_secs must be positive");
        }
        if self.chart_range().is_none() {
            bail!("chart.range must be 7, 30 or 90 (got {})", self.chart.range);
        }
        if self.risk.single_position_max <= 0.0 || self.risk.total_exposure_max <= 0.0 {
            bail!("risk limits must be positive");
        }
        Ok(())
    }

    /// Generate a digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "gamma={} top_n={} min_gap={:.2} interval={}s chart_range={} csv={}",
            self.feeds.gamma_url,
            self.markets.top_n,
            self.strategy.min_gap,
            self.refresh.update_interval_secs,
            self.chart.range,
            self.data.csv_enabled
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

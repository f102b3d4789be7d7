//! PolyAssist - terminal companion for Polymarket
//!
//! Polls the market feed, ranks the top markets, prices speaker/keyword
//! base rates against them and keeps a snapshot trail on disk.

use anyhow::{Context, Result};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use polyassist::chart::{nearest, points_from_records, ChartRange};
use polyassist::config::AppConfig;
use polyassist::dashboard::Dashboard;
use polyassist::feed::HttpFeed;
use polyassist::matcher::SpeakerDataset;
use polyassist::persistence::SnapshotWriter;
use polyassist::risk::compute_risk;
use polyassist::strategy::{analyze, format_percent, SignalConfig};
use polyassist::types::{ChartPoint, LiveStatus, NormalizedMarket};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = AppConfig::load()?;
    init_logging(cfg.logging.json);

    info!("🚀 Starting PolyAssist v{}", env!("CARGO_PKG_VERSION"));
    info!(config = %cfg, "Configuration loaded");

    let speakers = match SpeakerDataset::load(&cfg.data.speakers_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Speaker dataset unavailable, matching disabled");
            SpeakerDataset::default()
        }
    };

    let fallback = load_chart_fallback(&cfg.data.chart_fallback_path);
    let feed = HttpFeed::new(&cfg.feeds)?;
    let mut dashboard = Dashboard::new(cfg.normalize_options(), cfg.refresh.chart_refresh_secs)
        .with_chart_fallback(fallback);
    let snapshots = SnapshotWriter::new(&cfg.data.dir, cfg.data.csv_enabled)?;
    let signal_cfg = cfg.signal_config();
    let range = cfg.chart_range().unwrap_or_default();

    let mut ticker = tokio::time::interval(Duration::from_secs(cfg.refresh.update_interval_secs));
    let mut first_cycle = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match dashboard.refresh(&feed, first_cycle).await {
                    Ok(_) => {
                        first_cycle = false;
                        report_markets(dashboard.markets(), &speakers, &signal_cfg, cfg.risk.default_investment);
                        if let Err(e) = snapshots.record_cycle(dashboard.markets(), Utc::now()) {
                            warn!(error = %format!("{e:#}"), "Failed to write market snapshot");
                        }
                    }
                    Err(e) => warn!(error = %e, status = %dashboard.status(), "Cycle failed"),
                }
                report_chart(&dashboard, range);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, shutting down");
                break;
            }
        }
    }

    info!("👋 PolyAssist stopped");
    Ok(())
}

fn init_logging(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("polyassist=info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn load_chart_fallback(path: &str) -> Vec<ChartPoint> {
    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {path}"))
        .and_then(|json| {
            serde_json::from_str::<serde_json::Value>(&json)
                .with_context(|| format!("Failed to parse {path}"))
        });

    match payload {
        Ok(value) => {
            let points = points_from_records(&value);
            info!(path, points = points.len(), "Bundled price history loaded");
            points
        }
        Err(e) => {
            warn!(error = %format!("{e:#}"), "No bundled price history");
            Vec::new()
        }
    }
}

fn report_markets(
    markets: &[NormalizedMarket],
    speakers: &SpeakerDataset,
    signal_cfg: &SignalConfig,
    investment: f64,
) {
    for (rank, market) in markets.iter().enumerate() {
        info!(
            rank = rank + 1,
            probability = %format_percent(market.probability),
            change24h = %format!("{:+.1}%", market.change24h * 100.0),
            volume = market.volume,
            url = %market.url,
            "📊 {}",
            market.name
        );

        let matched = speakers.find_match("", &market.name);
        let Some(analysis) = analyze(&matched, Some(market.probability), signal_cfg) else {
            continue;
        };

        info!(
            speaker = %analysis.speaker,
            keyword = %analysis.keyword,
            base_rate = %format_percent(analysis.stat.base_rate),
            gap = %analysis.gap_display(),
            direction = %analysis.signal.direction,
            confidence = %format!("{:.0}%", analysis.signal.confidence * 100.0),
            risk = %analysis.signal.risk,
            "🎯 {}",
            analysis.recommendation
        );

        match compute_risk(analysis.stat.base_rate, market.probability, investment) {
            Ok(calc) => info!(
                stake = investment,
                expected_value = %format!("{:.2}", calc.expected_value),
                kelly = %format!("{:.1}%", calc.kelly_percent),
                "Kelly sizing"
            ),
            Err(e) => debug!(error = %e, market = %market.name, "Kelly sizing skipped"),
        }
    }
}

fn report_chart(dashboard: &Dashboard, range: ChartRange) {
    if dashboard.status() == LiveStatus::Stale {
        warn!(
            last_update = ?dashboard.last_update(),
            "Showing stale data"
        );
    }

    match dashboard.chart_window(range) {
        Ok(window) if !window.is_empty() => {
            let latest = nearest(&window, 1.0);
            info!(
                days = range.days(),
                low = window.min,
                high = window.max,
                latest = ?latest.map(|p| (&p.date, p.price)),
                "📈 Price window"
            );
        }
        Ok(_) => debug!("No price history yet"),
        Err(e) => warn!(error = %e, "Chart window failed"),
    }
}

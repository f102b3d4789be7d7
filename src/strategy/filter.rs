//! Strategy filter for market listings

use crate::matcher::SpeakerDataset;
use crate::types::NormalizedMarket;

/// Liquidity at or above which a market counts as liquid (USDC)
pub const HIGH_LIQUIDITY_THRESHOLD: f64 = 5_000.0;

/// Toggleable listing filter.
///
/// With every toggle off all markets pass. Otherwise a market passes when
/// any enabled criterion holds. The gap toggle has no per-market data to
/// test against in a listing, so it admits every market.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketFilter {
    pub gap: bool,
    pub speaker_markets: bool,
    pub high_liquidity: bool,
}

impl MarketFilter {
    pub fn is_active(&self) -> bool {
        self.gap || self.speaker_markets || self.high_liquidity
    }

    pub fn matches(&self, market: &NormalizedMarket, speakers: &SpeakerDataset) -> bool {
        if !self.is_active() || self.gap {
            return true;
        }
        if self.speaker_markets && speakers.mentions_any_speaker(&market.name) {
            return true;
        }
        self.high_liquidity && market.liquidity >= HIGH_LIQUIDITY_THRESHOLD
    }

    pub fn apply<'a>(
        &self,
        markets: &'a [NormalizedMarket],
        speakers: &SpeakerDataset,
    ) -> Vec<&'a NormalizedMarket> {
        markets
            .iter()
            .filter(|market| self.matches(market, speakers))
            .collect()
    }
}

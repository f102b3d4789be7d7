//! Polymarket feed ingestion: raw Gamma records and their normalization.

pub mod normalizer;
pub mod raw;

pub use normalizer::{
    normalize_batch, normalize_change, normalize_market, normalize_probability, NormalizeOptions,
    DEFAULT_SITE_ORIGIN, DEFAULT_TOP_N,
};
pub use raw::{decode_market_payload, RawMarket};

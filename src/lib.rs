//! PolyAssist Library
//!
//! Market normalization, speaker/keyword base rates, trading signals,
//! Kelly sizing and chart windows for a Polymarket assistant

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod feed;
pub mod matcher;
pub mod persistence;
pub mod polymarket;
pub mod risk;
pub mod strategy;
pub mod types;

pub use error::{AssistError, AssistResult};
pub use types::*;

//! Error types for the signal pipeline

use thiserror::Error;

/// Failures surfaced by the core pipeline.
///
/// None of these are fatal: feed failures leave the previous output on
/// display and domain errors are rejected at the call boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssistError {
    #[error("Feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("No usable market records in feed")]
    NoUsableRecords,

    #[error("Invalid input: {0}")]
    Domain(String),

    #[error("Reference dataset error: {0}")]
    Dataset(String),
}

pub type AssistResult<T> = std::result::Result<T, AssistError>;

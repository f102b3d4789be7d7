//! Speaker/Keyword Matcher
//!
//! Finds a known speaker in page text and the first of their tracked
//! keywords that also appears, returning the keyword's base rate.
//!
//! Matching is positional: the first speaker in dataset order whose name
//! appears wins, and within that speaker the first keyword in declared
//! order wins. A later, longer or more specific match never displaces an
//! earlier one.

pub mod page;

pub use page::{parse_probability_text, PageKind};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{AssistError, AssistResult};
use crate::types::{MatchResult, SpeakerKeywordRecord};

/// Reference dataset of speakers and keyword base rates, read-only after load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeakerDataset {
    records: Vec<SpeakerKeywordRecord>,
}

#[derive(Deserialize)]
struct DatasetDocument {
    records: Vec<SpeakerKeywordRecord>,
}

impl SpeakerDataset {
    pub fn new(records: Vec<SpeakerKeywordRecord>) -> Self {
        Self { records }
    }

    /// Parse `{ "records": [...] }`, keeping record and keyword order
    pub fn from_json(json: &str) -> AssistResult<Self> {
        let doc: DatasetDocument =
            serde_json::from_str(json).map_err(|e| AssistError::Dataset(e.to_string()))?;
        Ok(Self::new(doc.records))
    }

    /// Load the dataset file once at startup
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read speaker dataset {}", path.display()))?;
        let dataset = Self::from_json(&json)
            .with_context(|| format!("Failed to parse speaker dataset {}", path.display()))?;
        info!(
            path = %path.display(),
            speakers = dataset.len(),
            "Speaker dataset loaded"
        );
        Ok(dataset)
    }

    pub fn records(&self) -> &[SpeakerKeywordRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find_match(&self, page_text: &str, title: &str) -> MatchResult {
        match_speaker(page_text, title, &self.records)
    }

    /// Whether any known speaker is named in `text`
    pub fn mentions_any_speaker(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.records
            .iter()
            .any(|record| haystack.contains(&record.name.to_lowercase()))
    }
}

/// Scan `page_text` and `title` for the first known speaker and keyword
pub fn match_speaker(
    page_text: &str,
    title: &str,
    records: &[SpeakerKeywordRecord],
) -> MatchResult {
    let haystack = format!("{page_text} {title}").to_lowercase();

    let Some(record) = records
        .iter()
        .find(|record| haystack.contains(&record.name.to_lowercase()))
    else {
        return MatchResult::NoMatch;
    };

    let keyword_hit = record
        .keywords
        .iter()
        .find(|(keyword, _)| haystack.contains(&keyword.to_lowercase()));

    match keyword_hit {
        Some((keyword, stat)) => {
            debug!(speaker = %record.name, keyword = %keyword, "Speaker and keyword matched");
            MatchResult::SpeakerAndKeyword {
                speaker: record.name.clone(),
                keyword: keyword.clone(),
                stat: *stat,
            }
        }
        None => {
            debug!(speaker = %record.name, "Speaker matched without keyword");
            MatchResult::SpeakerOnly {
                speaker: record.name.clone(),
            }
        }
    }
}

//! Core data types for listings, extracted details, and report records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Page-scoped handle to one listing on a search-results page.
///
/// The id is the listing's marker class name. A reference is only valid on the
/// page it was enumerated from; navigating to the next page invalidates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingRef {
    pub id: String,
    pub page: usize,
}

impl ListingRef {
    pub fn new(id: impl Into<String>, page: usize) -> Self {
        Self {
            id: id.into(),
            page,
        }
    }

    /// CSS selector for an element nested inside the listing.
    pub fn nested(&self, inner: &str) -> String {
        format!(".{} {}", self.id, inner)
    }
}

impl std::fmt::Display for ListingRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@p{}", self.id, self.page)
    }
}

/// The minimum needed to run the title filter before opening the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCandidate {
    pub id: ListingRef,
    pub title: String,
}

/// Raw detail-view text as returned by the snapshot script.
///
/// Every field is independent: the script yields `null` for any element that
/// is missing from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailSnapshot {
    pub company: Option<String>,
    pub location: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub date_text: Option<String>,
}

/// Structured fields pulled out of an opened detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDetail {
    pub company: Option<String>,
    pub location: Option<String>,
    pub title: String,
    pub url: String,
    pub description: String,
    pub date_posted: Option<NaiveDate>,
}

/// Whether a description states a minimum years-of-experience requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceAssessment {
    /// `true` when no requirement was detected.
    pub minimum_met: bool,
    /// Detected minimum, `0` when none could be captured.
    pub minimum_years: u32,
}

impl Default for ExperienceAssessment {
    fn default() -> Self {
        Self {
            minimum_met: true,
            minimum_years: 0,
        }
    }
}

/// One accepted listing, as it appears in the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingRecord {
    #[serde(flatten)]
    pub detail: ExtractedDetail,
    #[serde(flatten)]
    pub experience: ExperienceAssessment,
}

/// Pagination state, refreshed once per page iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalState {
    pub current_page_has_next: bool,
}

/// Counters collected over one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraversalStats {
    pub pages_processed: usize,
    pub listings_seen: usize,
    pub listings_accepted: usize,
    /// Listings whose detail view was clicked open, accepted or not.
    pub detail_views_opened: usize,
    /// Set when the traversal stopped on a page-controller failure.
    pub aborted: Option<String>,
}

/// Errors that can occur in the sifting pipeline.
#[derive(thiserror::Error, Debug)]
pub enum SiftError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Required element missing: {0}")]
    MissingElement(String),

    #[error("Timed out after {ms}ms waiting for {what}")]
    Timeout { what: String, ms: u64 },

    #[error("Unexpected script result: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid keyword pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type SiftResult<T> = Result<T, SiftError>;

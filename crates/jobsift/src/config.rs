//! Pipeline configuration: keyword sets, site selectors, and pacing.

use serde::{Deserialize, Serialize};

use crate::delay::DelayProfile;
use crate::filter::TitleFilter;
use crate::types::{SiftError, SiftResult};

/// Keyword fragments for the title filter.
///
/// Each entry is a regular-expression fragment matched case-insensitively
/// anywhere in the title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keywords {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for Keywords {
    fn default() -> Self {
        let include = ["front", "ui", "web", "software"];
        let exclude = [
            "senior",
            "founding",
            "head",
            "staff",
            "lead",
            "mid",
            "angular",
            "vue",
            "full",
            r"\bsr\b",
            r"\bii\b",
            r"\biii\b",
            "years",
            // Java but not JavaScript.
            "java(?:[^s]|$)",
        ];
        Self {
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// CSS selectors describing the listing site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    /// Container whose children are the result listings.
    pub results_list: String,
    /// Substring identifying a listing's marker class.
    pub listing_marker: String,
    /// Title element inside a listing.
    pub listing_title: String,
    /// Element scrolled to load lazy results.
    pub results_pane: String,
    /// The "next page" control.
    pub next_page: String,
    /// Detail pane that becomes visible after a listing is clicked.
    pub detail_pane: String,
    pub detail: DetailSelectors,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            results_list: ".jobsearch-ResultsList".to_string(),
            listing_marker: "job".to_string(),
            listing_title: "h2".to_string(),
            results_pane: ".jobsearch-LeftPane".to_string(),
            next_page: "a[data-testid='pagination-page-next']".to_string(),
            detail_pane: "#jobsearch-ViewjobPaneWrapper".to_string(),
            detail: DetailSelectors::default(),
        }
    }
}

/// Per-field selectors inside the detail pane.
///
/// An empty selector disables that field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    pub company: String,
    pub location: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub date: String,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            company: "[data-testid='inlineHeader-companyName']".to_string(),
            location: "[data-testid='inlineHeader-companyLocation']".to_string(),
            title: ".jobsearch-JobInfoHeader-title".to_string(),
            url: String::new(),
            description: "#jobDescriptionText".to_string(),
            date: "[data-testid='myJobsStateDate']".to_string(),
        }
    }
}

impl DetailSelectors {
    /// Argument object for [`crate::scripts::DETAIL_SNAPSHOT`].
    pub fn to_script_arg(&self) -> serde_json::Value {
        let field = |s: &str| {
            if s.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::Value::String(s.to_string())
            }
        };
        serde_json::json!({
            "company": field(&self.company),
            "location": field(&self.location),
            "title": field(&self.title),
            "url": field(&self.url),
            "description": field(&self.description),
            "date": field(&self.date),
        })
    }
}

/// Everything the traversal needs besides the page controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    pub keywords: Keywords,
    pub selectors: SiteSelectors,
    pub delays: DelayProfile,
    /// Stop after this many pages even if a next page exists.
    pub max_pages: Option<usize>,
}

impl SiftConfig {
    /// Check delay ordering and keyword patterns.
    pub fn validate(&self) -> SiftResult<()> {
        self.delays.validate()?;
        TitleFilter::from_keywords(&self.keywords)?;
        if self.max_pages == Some(0) {
            return Err(SiftError::Config("max_pages must be at least 1".into()));
        }
        if self.selectors.results_list.trim().is_empty() {
            return Err(SiftError::Config("results_list selector is empty".into()));
        }
        Ok(())
    }
}

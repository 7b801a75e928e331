//! Turn a detail-view snapshot into structured posting fields.
//!
//! Fields are independent: a missing company never costs the location, and a
//! date phrase that is not recognized only leaves `date_posted` empty.

use chrono::{Duration, Local, NaiveDate};
use regex::Regex;

use crate::types::{DetailSnapshot, ExtractedDetail};

/// Extraction rules for detail views.
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    newlines: Regex,
    days_ago: Regex,
    hours_ago: Regex,
}

impl ExtractionRules {
    pub fn new() -> Self {
        Self {
            newlines: Regex::new(r"[\r\n]+").expect("newline regex is valid"),
            days_ago: Regex::new(r"(?i)\b(\d{1,3})\+?\s*days?\s+ago\b")
                .expect("days-ago regex is valid"),
            hours_ago: Regex::new(r"(?i)\b\d{1,2}\+?\s*(?:hours?|hrs?|minutes?|mins?)\s+ago\b")
                .expect("hours-ago regex is valid"),
        }
    }

    /// Extract using today's local date as the anchor for relative dates.
    pub fn extract(&self, snapshot: &DetailSnapshot) -> ExtractedDetail {
        self.extract_at(snapshot, Local::now().date_naive())
    }

    pub fn extract_at(&self, snapshot: &DetailSnapshot, today: NaiveDate) -> ExtractedDetail {
        ExtractedDetail {
            company: clean(snapshot.company.as_deref()),
            location: clean(snapshot.location.as_deref()),
            title: clean(snapshot.title.as_deref()).unwrap_or_default(),
            url: clean(snapshot.url.as_deref()).unwrap_or_default(),
            description: snapshot
                .description
                .as_deref()
                .map(|d| self.collapse_newlines(d))
                .unwrap_or_default(),
            date_posted: snapshot
                .date_text
                .as_deref()
                .and_then(|text| self.resolve_date(text, today)),
        }
    }

    /// Replace every run of line breaks with one space.
    pub fn collapse_newlines(&self, text: &str) -> String {
        self.newlines.replace_all(text, " ").trim().to_string()
    }

    /// Convert relative posting phrases into a calendar date.
    pub fn resolve_date(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        let lower = text.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        if let Some(caps) = self.days_ago.captures(&lower) {
            let days: i64 = caps.get(1)?.as_str().parse().ok()?;
            return today.checked_sub_signed(Duration::days(days));
        }
        if lower.contains("yesterday") {
            return today.pred_opt();
        }
        if lower.contains("today")
            || lower.contains("just posted")
            || self.hours_ago.is_match(&lower)
        {
            return Some(today);
        }
        None
    }
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self::new()
    }
}

fn clean(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

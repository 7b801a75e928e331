//! Years-of-experience detection over free-text job descriptions.
//!
//! Detection and numeric extraction are separate: a broad pattern decides
//! whether a requirement is stated at all, then an ordered list of narrower
//! rules tries to capture the number. The first rule that captures wins.

use regex::Regex;

use crate::types::ExperienceAssessment;

/// Broad "a years requirement is mentioned" pattern.
const DETECT_PATTERN: &str = r"(?i)\b\d{1,2}\s*\+?\s*(?:(?:-|–|to)\s*\d{1,2}\s*\+?\s*)?(?:years?|yrs?)\b|\b(?:years?|yrs?)\s+of\s+(?:[a-z-]+\s+){0,2}experience\b";

/// Numeric rules, tried in order.
const YEARS_RULES: &[(&str, &str)] = &[
    (
        "range",
        r"(?i)\b(\d{1,2})\s*\+?\s*(?:-|–|to)\s*\d{1,2}\s*\+?\s*(?:years?|yrs?)\b",
    ),
    ("plus", r"(?i)\b(\d{1,2})\s*\+\s*(?:years?|yrs?)\b"),
    (
        "at_least",
        r"(?i)\b(?:at\s+least|minimum(?:\s+of)?)\s+(\d{1,2})\s*(?:years?|yrs?)\b",
    ),
    ("plain", r"(?i)\b(\d{1,2})\s*(?:years?|yrs?)\b"),
];

#[derive(Debug, Clone)]
struct YearsRule {
    name: &'static str,
    pattern: Regex,
}

impl YearsRule {
    fn capture(&self, text: &str) -> Option<u32> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

/// Parser for minimum years-of-experience requirements.
///
/// Never excludes a listing; it only annotates it.
#[derive(Debug, Clone)]
pub struct ExperienceFilter {
    detect: Regex,
    rules: Vec<YearsRule>,
}

impl ExperienceFilter {
    pub fn new() -> Self {
        let detect = Regex::new(DETECT_PATTERN).expect("detection regex is valid");
        let rules = YEARS_RULES
            .iter()
            .map(|&(name, pattern)| YearsRule {
                name,
                pattern: Regex::new(pattern).expect("years rule regex is valid"),
            })
            .collect();
        Self { detect, rules }
    }

    pub fn assess(&self, description: &str) -> ExperienceAssessment {
        self.explain(description).0
    }

    /// Assess and also report which numeric rule supplied the years, if any.
    pub fn explain(&self, description: &str) -> (ExperienceAssessment, Option<&'static str>) {
        if !self.detect.is_match(description) {
            return (ExperienceAssessment::default(), None);
        }
        let hit = self
            .rules
            .iter()
            .find_map(|rule| rule.capture(description).map(|years| (rule.name, years)));
        let assessment = ExperienceAssessment {
            minimum_met: false,
            minimum_years: hit.map(|(_, years)| years).unwrap_or(0),
        };
        (assessment, hit.map(|(name, _)| name))
    }
}

impl Default for ExperienceFilter {
    fn default() -> Self {
        Self::new()
    }
}

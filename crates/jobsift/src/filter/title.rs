//! Keyword classifier deciding whether a listing title is worth opening.

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::config::Keywords;
use crate::types::SiftResult;

/// Outcome of classifying one title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum TitleVerdict {
    Accepted { keyword: String },
    Excluded { keyword: String },
    NoRoleKeyword,
    Empty,
}

impl TitleVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, TitleVerdict::Accepted { .. })
    }
}

#[derive(Debug, Clone)]
struct Keyword {
    source: String,
    pattern: Regex,
}

impl Keyword {
    fn compile(source: &str) -> SiftResult<Self> {
        let pattern = RegexBuilder::new(source).case_insensitive(true).build()?;
        Ok(Self {
            source: source.to_string(),
            pattern,
        })
    }
}

/// Include/exclude keyword predicate over listing titles.
///
/// A title passes when it hits at least one include keyword and no exclude
/// keyword. Exclusion wins regardless of which includes are present.
#[derive(Debug, Clone)]
pub struct TitleFilter {
    include: Vec<Keyword>,
    exclude: Vec<Keyword>,
}

impl TitleFilter {
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> SiftResult<Self> {
        let include = include
            .iter()
            .map(|k| Keyword::compile(k.as_ref()))
            .collect::<SiftResult<Vec<_>>>()?;
        let exclude = exclude
            .iter()
            .map(|k| Keyword::compile(k.as_ref()))
            .collect::<SiftResult<Vec<_>>>()?;
        Ok(Self { include, exclude })
    }

    pub fn from_keywords(keywords: &Keywords) -> SiftResult<Self> {
        Self::new(&keywords.include, &keywords.exclude)
    }

    pub fn matches(&self, title: &str) -> bool {
        self.verdict(title).is_accepted()
    }

    pub fn verdict(&self, title: &str) -> TitleVerdict {
        let title = title.trim();
        if title.is_empty() {
            return TitleVerdict::Empty;
        }
        if let Some(k) = self.exclude.iter().find(|k| k.pattern.is_match(title)) {
            return TitleVerdict::Excluded {
                keyword: k.source.clone(),
            };
        }
        match self.include.iter().find(|k| k.pattern.is_match(title)) {
            Some(k) => TitleVerdict::Accepted {
                keyword: k.source.clone(),
            },
            None => TitleVerdict::NoRoleKeyword,
        }
    }
}

//! Per-listing pipeline: title check, detail view, extraction, assessment.

use serde_json::json;

use crate::config::{SiftConfig, SiteSelectors};
use crate::delay::{pause, DelayBounds};
use crate::extract::ExtractionRules;
use crate::filter::{ExperienceFilter, TitleFilter};
use crate::page::{evaluate_as, PageController};
use crate::scripts;
use crate::types::{
    DetailSnapshot, ListingCandidate, ListingRef, PostingRecord, SiftResult, TraversalStats,
};

/// Turns one listing reference into zero or one posting record.
#[derive(Debug, Clone)]
pub struct ListingProcessor {
    title_filter: TitleFilter,
    experience: ExperienceFilter,
    extraction: ExtractionRules,
    selectors: SiteSelectors,
    detail_settle: DelayBounds,
}

impl ListingProcessor {
    pub fn new(config: &SiftConfig) -> SiftResult<Self> {
        Ok(Self {
            title_filter: TitleFilter::from_keywords(&config.keywords)?,
            experience: ExperienceFilter::new(),
            extraction: ExtractionRules::new(),
            selectors: config.selectors.clone(),
            detail_settle: config.delays.detail_settle,
        })
    }

    pub fn title_filter(&self) -> &TitleFilter {
        &self.title_filter
    }

    /// Run the listing through the pipeline.
    ///
    /// Returns `Ok(None)` for titles the filter rejects; those never open the
    /// detail view. Page-controller failures propagate. A detail view counts
    /// as opened in `stats` once its click has gone through.
    pub async fn process(
        &self,
        reference: &ListingRef,
        page: &dyn PageController,
        stats: &mut TraversalStats,
    ) -> SiftResult<Option<PostingRecord>> {
        let candidate = Some(self.read_candidate(reference, page).await?)
            .filter(|candidate| self.admits(candidate));
        let Some(candidate) = candidate else {
            return Ok(None);
        };
        let snapshot = self.open_detail(&candidate, page, stats).await?;
        Ok(Some(self.assemble(&candidate, &snapshot)))
    }

    async fn read_candidate(
        &self,
        reference: &ListingRef,
        page: &dyn PageController,
    ) -> SiftResult<ListingCandidate> {
        let selector = reference.nested(&self.selectors.listing_title);
        let title: Option<String> =
            evaluate_as(page, scripts::INNER_TEXT, &[json!(selector)]).await?;
        Ok(ListingCandidate {
            id: reference.clone(),
            title: title.unwrap_or_default(),
        })
    }

    fn admits(&self, candidate: &ListingCandidate) -> bool {
        let verdict = self.title_filter.verdict(&candidate.title);
        tracing::debug!(listing = %candidate.id, title = %candidate.title, ?verdict, "title check");
        verdict.is_accepted()
    }

    async fn open_detail(
        &self,
        candidate: &ListingCandidate,
        page: &dyn PageController,
        stats: &mut TraversalStats,
    ) -> SiftResult<DetailSnapshot> {
        page.click(&candidate.id.nested(&self.selectors.listing_title)).await?;
        stats.detail_views_opened += 1;
        page.wait_for_selector(&self.selectors.detail_pane, true).await?;
        pause(page, self.detail_settle, "detail settle").await?;
        evaluate_as(
            page,
            scripts::DETAIL_SNAPSHOT,
            &[self.selectors.detail.to_script_arg()],
        )
        .await
    }

    fn assemble(&self, candidate: &ListingCandidate, snapshot: &DetailSnapshot) -> PostingRecord {
        let mut detail = self.extraction.extract(snapshot);
        if detail.title.is_empty() {
            detail.title = candidate.title.trim().to_string();
        }
        if detail.company.is_none() {
            tracing::warn!(listing = %candidate.id, "detail view has no company");
        }
        let experience = self.experience.assess(&detail.description);
        tracing::info!(
            listing = %candidate.id,
            title = %detail.title,
            minimum_years = experience.minimum_years,
            "accepted listing"
        );
        PostingRecord { detail, experience }
    }
}

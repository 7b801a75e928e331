//! Page-by-page traversal of the search results.
//!
//! The loop processes the current page, then follows the "next" control if
//! one is present. Any page-controller failure ends the traversal; records
//! gathered up to that point are still returned.

use serde_json::json;

use crate::config::{SiftConfig, SiteSelectors};
use crate::delay::{pause, DelayProfile};
use crate::listing::ListingProcessor;
use crate::page::{evaluate_as, PageController};
use crate::scripts;
use crate::types::{
    ListingRef, PostingRecord, SiftError, SiftResult, TraversalState, TraversalStats,
};

/// Drives the traversal and owns the listing processor.
#[derive(Debug, Clone)]
pub struct PaginationController {
    processor: ListingProcessor,
    selectors: SiteSelectors,
    delays: DelayProfile,
    max_pages: Option<usize>,
    stats: TraversalStats,
}

impl PaginationController {
    pub fn new(config: &SiftConfig) -> SiftResult<Self> {
        config.validate()?;
        Ok(Self {
            processor: ListingProcessor::new(config)?,
            selectors: config.selectors.clone(),
            delays: config.delays,
            max_pages: config.max_pages,
            stats: TraversalStats::default(),
        })
    }

    /// Counters from the most recent [`run`](Self::run).
    pub fn stats(&self) -> &TraversalStats {
        &self.stats
    }

    /// Traverse every results page reachable from the current one.
    ///
    /// Best effort: a failure is logged and the partial result returned.
    /// The page without a "next" control is processed before stopping.
    pub async fn run(&mut self, page: &dyn PageController) -> Vec<PostingRecord> {
        self.stats = TraversalStats::default();
        let mut records = Vec::new();

        if let Err(e) = self.traverse(page, &mut records).await {
            tracing::error!(
                error = %e,
                pages = self.stats.pages_processed,
                records = records.len(),
                "traversal aborted, keeping partial results"
            );
            self.stats.aborted = Some(e.to_string());
        }

        tracing::info!(
            pages = self.stats.pages_processed,
            seen = self.stats.listings_seen,
            accepted = self.stats.listings_accepted,
            opened = self.stats.detail_views_opened,
            "traversal finished"
        );
        records
    }

    async fn traverse(
        &mut self,
        page: &dyn PageController,
        records: &mut Vec<PostingRecord>,
    ) -> SiftResult<()> {
        let mut state = TraversalState {
            current_page_has_next: self.next_control_present(page).await?,
        };

        loop {
            let page_number = self.stats.pages_processed + 1;
            self.process_page(page, page_number, records).await?;
            self.stats.pages_processed = page_number;

            if !state.current_page_has_next {
                tracing::info!(page = page_number, "no next page, stopping");
                break;
            }
            if self.max_pages.is_some_and(|max| page_number >= max) {
                tracing::info!(page = page_number, "page limit reached, stopping");
                break;
            }

            self.advance(page).await?;
            state.current_page_has_next = self.next_control_present(page).await?;
        }
        Ok(())
    }

    async fn process_page(
        &mut self,
        page: &dyn PageController,
        page_number: usize,
        records: &mut Vec<PostingRecord>,
    ) -> SiftResult<()> {
        let listings = self.listing_refs(page, page_number).await?;
        tracing::info!(page = page_number, listings = listings.len(), "processing page");

        page.evaluate(scripts::SCROLL_TO_BOTTOM, &[json!(self.selectors.results_pane)]).await?;
        pause(page, self.delays.page_settle, "page settle").await?;

        for reference in &listings {
            self.stats.listings_seen += 1;
            let outcome = self.processor.process(reference, page, &mut self.stats).await?;
            if let Some(record) = outcome {
                self.stats.listings_accepted += 1;
                records.push(record);
            }
        }
        Ok(())
    }

    async fn listing_refs(
        &self,
        page: &dyn PageController,
        page_number: usize,
    ) -> SiftResult<Vec<ListingRef>> {
        let ids: Option<Vec<String>> = evaluate_as(
            page,
            scripts::LISTING_IDS,
            &[
                json!(self.selectors.results_list),
                json!(self.selectors.listing_marker),
            ],
        )
        .await?;
        let ids =
            ids.ok_or_else(|| SiftError::MissingElement(self.selectors.results_list.clone()))?;
        Ok(ids
            .into_iter()
            .map(|id| ListingRef::new(id, page_number))
            .collect())
    }

    async fn next_control_present(&self, page: &dyn PageController) -> SiftResult<bool> {
        evaluate_as(page, scripts::ELEMENT_PRESENT, &[json!(self.selectors.next_page)]).await
    }

    /// Click "next" while waiting for the navigation it triggers, then settle.
    async fn advance(&self, page: &dyn PageController) -> SiftResult<()> {
        let (clicked, navigated) = futures::join!(
            page.click(&self.selectors.next_page),
            page.wait_for_navigation()
        );
        clicked?;
        navigated?;
        pause(page, self.delays.next_page, "next page settle").await
    }
}

//! Randomized pacing between page actions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::page::PageController;
use crate::types::{SiftError, SiftResult};

/// Inclusive millisecond range a pause is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayBounds {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayBounds {
    pub fn new(min_ms: u64, max_ms: u64) -> SiftResult<Self> {
        let bounds = Self { min_ms, max_ms };
        bounds.validate()?;
        Ok(bounds)
    }

    /// A fixed, non-random pause.
    pub const fn fixed(ms: u64) -> Self {
        Self {
            min_ms: ms,
            max_ms: ms,
        }
    }

    pub fn validate(&self) -> SiftResult<()> {
        if self.min_ms > self.max_ms {
            return Err(SiftError::Config(format!(
                "delay min {}ms exceeds max {}ms",
                self.min_ms, self.max_ms
            )));
        }
        Ok(())
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        if self.min_ms >= self.max_ms {
            return self.min_ms;
        }
        rng.gen_range(self.min_ms..=self.max_ms)
    }
}

/// The three pauses the traversal takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayProfile {
    /// After scrolling a results page to the bottom.
    pub page_settle: DelayBounds,
    /// After a listing's detail pane becomes visible.
    pub detail_settle: DelayBounds,
    /// After navigating to the next results page.
    pub next_page: DelayBounds,
}

impl Default for DelayProfile {
    fn default() -> Self {
        Self {
            page_settle: DelayBounds {
                min_ms: 1000,
                max_ms: 1800,
            },
            detail_settle: DelayBounds {
                min_ms: 600,
                max_ms: 1400,
            },
            next_page: DelayBounds {
                min_ms: 500,
                max_ms: 1500,
            },
        }
    }
}

impl DelayProfile {
    /// Zero pauses everywhere.
    pub const fn immediate() -> Self {
        Self {
            page_settle: DelayBounds::fixed(0),
            detail_settle: DelayBounds::fixed(0),
            next_page: DelayBounds::fixed(0),
        }
    }

    pub fn validate(&self) -> SiftResult<()> {
        self.page_settle.validate()?;
        self.detail_settle.validate()?;
        self.next_page.validate()
    }
}

/// Draw a pause from `bounds` and wait it out on the page controller.
pub async fn pause(page: &dyn PageController, bounds: DelayBounds, reason: &str) -> SiftResult<()> {
    let ms = bounds.sample(&mut rand::thread_rng());
    tracing::trace!(ms, reason, "pausing");
    page.wait(ms).await
}

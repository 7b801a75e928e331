//! One end-to-end run: launch, traverse, report.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::Instrument;

use jobsift::{PageController, PaginationController, ReportAssembler, TraversalStats};

use crate::browser::ChromiumSession;
use crate::config::AppConfig;
use crate::sink::FileSink;

/// What a finished run reports back to `main`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub rows_written: usize,
    pub output: std::path::PathBuf,
    pub stats: TraversalStats,
}

/// Validate, launch Chromium, traverse every page and write the report.
///
/// Traversal failures end the run early but still write whatever was
/// accepted. Config, launch and write failures are returned as errors.
pub async fn run(config: &AppConfig) -> Result<RunSummary> {
    let run_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("run", run_id = %run_id);
    execute(config, run_id).instrument(span).await
}

async fn execute(config: &AppConfig, run_id: String) -> Result<RunSummary> {
    config.validate()?;
    let mut controller =
        PaginationController::new(&config.sift).context("failed to build pipeline")?;

    tracing::info!(url = %config.url, headless = config.browser.headless, "starting run");
    let session = ChromiumSession::launch(&config.browser).await?;
    let page = session.page().await?;

    let (records, stats) = traverse(&mut controller, &page, &config.url).await;

    let mut report = ReportAssembler::new(config.output.columns);
    report.extend(records);
    let mut sink = FileSink::new(&config.output.path);
    let written = report.write_to(&mut sink, config.output.format);

    if let Err(e) = session.close().await {
        tracing::warn!("browser shutdown: {e:#}");
    }

    let rows_written = written.with_context(|| {
        format!("failed to write report: {}", config.output.path.display())
    })?;

    tracing::info!(
        pages = stats.pages_processed,
        seen = stats.listings_seen,
        accepted = stats.listings_accepted,
        opened = stats.detail_views_opened,
        output = %config.output.path.display(),
        "run finished"
    );

    Ok(RunSummary {
        run_id,
        rows_written,
        output: config.output.path.clone(),
        stats,
    })
}

/// Open the search URL and hand the page to the controller.
async fn traverse(
    controller: &mut PaginationController,
    page: &dyn PageController,
    url: &str,
) -> (Vec<jobsift::PostingRecord>, TraversalStats) {
    if let Err(e) = page.navigate(url).await {
        tracing::error!("could not open search page: {e}");
        let stats = TraversalStats {
            aborted: Some(e.to_string()),
            ..TraversalStats::default()
        };
        return (Vec::new(), stats);
    }
    let records = controller.run(page).await;
    (records, controller.stats().clone())
}

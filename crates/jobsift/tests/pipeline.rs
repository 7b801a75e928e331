//! Traversal tests against an in-memory listing site.
//!
//! Covers pagination termination, the title-filter gate in front of the
//! detail view, partial results on failure, and report assembly.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use jobsift::scripts;
use jobsift::{
    DelayBounds, DelayProfile, DetailSnapshot, PageController, PaginationController,
    ReportAssembler, SiftConfig, SiftError, SiftResult, SiteSelectors,
};

// ─────────────────────── helpers ───────────────────────

#[derive(Clone)]
struct FakeListing {
    id: String,
    title: Option<String>,
    snapshot: DetailSnapshot,
}

#[derive(Clone)]
struct FakePage {
    listings: Vec<FakeListing>,
    has_next: bool,
    has_results_list: bool,
}

#[derive(Default)]
struct SiteLog {
    current: usize,
    open_detail: Option<String>,
    detail_loads: Vec<String>,
    navigations: usize,
    scrolls: usize,
    waits: Vec<u64>,
}

/// A paginated results site that answers the pipeline's scripts.
struct FakeSite {
    pages: Vec<FakePage>,
    selectors: SiteSelectors,
    fail_click_on: Option<String>,
    log: Mutex<SiteLog>,
}

impl FakeSite {
    fn new(pages: Vec<FakePage>) -> Self {
        Self {
            pages,
            selectors: SiteSelectors::default(),
            fail_click_on: None,
            log: Mutex::new(SiteLog::default()),
        }
    }

    fn failing_click_on(mut self, id: &str) -> Self {
        self.fail_click_on = Some(id.to_string());
        self
    }

    fn current_page(&self) -> &FakePage {
        &self.pages[self.log.lock().unwrap().current]
    }

    fn detail_loads(&self) -> Vec<String> {
        self.log.lock().unwrap().detail_loads.clone()
    }

    fn navigations(&self) -> usize {
        self.log.lock().unwrap().navigations
    }

    fn waits(&self) -> Vec<u64> {
        self.log.lock().unwrap().waits.clone()
    }

    /// Listing id from a ".{id} h2" selector.
    fn listing_id(selector: &str) -> Option<&str> {
        selector.strip_prefix('.')?.split_whitespace().next()
    }

    fn find_listing(&self, selector: &str) -> Option<FakeListing> {
        let id = Self::listing_id(selector)?;
        self.current_page()
            .listings
            .iter()
            .find(|l| l.id == id)
            .cloned()
    }
}

#[async_trait]
impl PageController for FakeSite {
    async fn navigate(&self, _url: &str) -> SiftResult<()> {
        Ok(())
    }

    async fn evaluate(&self, script: &str, args: &[Value]) -> SiftResult<Value> {
        let page = self.current_page().clone();
        if script == scripts::LISTING_IDS {
            if !page.has_results_list {
                return Ok(Value::Null);
            }
            let ids: Vec<_> = page.listings.iter().map(|l| l.id.clone()).collect();
            return Ok(json!(ids));
        }
        if script == scripts::ELEMENT_PRESENT {
            assert_eq!(args[0], json!(self.selectors.next_page));
            return Ok(json!(page.has_next));
        }
        if script == scripts::INNER_TEXT {
            let selector = args[0].as_str().unwrap_or_default();
            let title = self.find_listing(selector).and_then(|l| l.title);
            return Ok(json!(title));
        }
        if script == scripts::SCROLL_TO_BOTTOM {
            self.log.lock().unwrap().scrolls += 1;
            return Ok(Value::Null);
        }
        if script == scripts::DETAIL_SNAPSHOT {
            let open = self.log.lock().unwrap().open_detail.clone();
            let listing = open
                .and_then(|id| page.listings.iter().find(|l| l.id == id).cloned())
                .ok_or_else(|| SiftError::Browser("no detail pane open".into()))?;
            return Ok(serde_json::to_value(listing.snapshot)?);
        }
        Err(SiftError::Browser(format!("unknown script: {script}")))
    }

    async fn click(&self, selector: &str) -> SiftResult<()> {
        if selector == self.selectors.next_page {
            let mut log = self.log.lock().unwrap();
            if !self.pages[log.current].has_next {
                return Err(SiftError::MissingElement(selector.to_string()));
            }
            log.current += 1;
            log.navigations += 1;
            log.open_detail = None;
            return Ok(());
        }
        let listing = self
            .find_listing(selector)
            .ok_or_else(|| SiftError::MissingElement(selector.to_string()))?;
        if self.fail_click_on.as_deref() == Some(listing.id.as_str()) {
            return Err(SiftError::Navigation(format!("click on {} timed out", listing.id)));
        }
        let mut log = self.log.lock().unwrap();
        log.open_detail = Some(listing.id.clone());
        log.detail_loads.push(listing.id);
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, _visible: bool) -> SiftResult<()> {
        if self.log.lock().unwrap().open_detail.is_some() {
            Ok(())
        } else {
            Err(SiftError::MissingElement(selector.to_string()))
        }
    }

    async fn wait_for_navigation(&self) -> SiftResult<()> {
        Ok(())
    }

    async fn wait(&self, duration_ms: u64) -> SiftResult<()> {
        self.log.lock().unwrap().waits.push(duration_ms);
        Ok(())
    }
}

fn listing(n: usize, title: &str, description: &str) -> FakeListing {
    FakeListing {
        id: format!("job_{n}"),
        title: Some(title.to_string()),
        snapshot: DetailSnapshot {
            company: Some(format!("Company {n}")),
            location: Some("New York, NY".into()),
            title: Some(title.to_string()),
            url: Some(format!("https://jobs.example/view?jk={n}")),
            description: Some(description.to_string()),
            date_text: Some("Just posted".into()),
        },
    }
}

fn page(listings: Vec<FakeListing>, has_next: bool) -> FakePage {
    FakePage {
        listings,
        has_next,
        has_results_list: true,
    }
}

fn config() -> SiftConfig {
    SiftConfig {
        delays: DelayProfile::immediate(),
        ..Default::default()
    }
}

/// Two pages, three listings each; 1, 4 and 5 are role titles.
fn two_page_site() -> FakeSite {
    FakeSite::new(vec![
        page(
            vec![
                listing(1, "Frontend Engineer", "Build things.\nWith us."),
                listing(2, "Senior Frontend Engineer", "Lead things."),
                listing(3, "Backend Engineer", "Go and Postgres."),
            ],
            true,
        ),
        page(
            vec![
                listing(4, "UI Developer", "Great team culture"),
                listing(5, "Web Developer", "You bring 3+ years of React."),
                listing(6, "Java Developer", "Spring Boot."),
            ],
            false,
        ),
    ])
}

/// `count` pages with one role listing each; only the last lacks "next".
fn linear_site(count: usize) -> FakeSite {
    FakeSite::new(
        (1..=count)
            .map(|n| page(vec![listing(n, "Frontend Engineer", "")], n < count))
            .collect(),
    )
}

// ─────────────────────── end to end ───────────────────────

#[tokio::test]
async fn end_to_end_two_pages() {
    let site = two_page_site();
    let mut controller = PaginationController::new(&config()).unwrap();

    let records = controller.run(&site).await;

    assert_eq!(records.len(), 3);
    assert_eq!(site.detail_loads(), ["job_1", "job_4", "job_5"]);

    let mut report = ReportAssembler::default();
    report.extend(records);
    let rows = report.rows();
    assert_eq!(rows.len(), 3);

    let last: Vec<_> = rows[2].split('\t').collect();
    assert_eq!(last[0], "no");
    assert_eq!(last[1], "3");
    assert_eq!(last[2], "Company 5");
    assert_eq!(last[3], "Web Developer");
    assert_eq!(last[6], "https://jobs.example/view?jk=5");

    let first: Vec<_> = rows[0].split('\t').collect();
    assert_eq!(first[0], "yes");
    assert_eq!(first[1], "0");

    let stats = controller.stats();
    assert_eq!(stats.pages_processed, 2);
    assert_eq!(stats.listings_seen, 6);
    assert_eq!(stats.listings_accepted, 3);
    assert_eq!(stats.detail_views_opened, 3);
    assert!(stats.aborted.is_none());
}

#[tokio::test]
async fn description_newlines_are_collapsed() {
    let site = two_page_site();
    let mut controller = PaginationController::new(&config()).unwrap();
    let records = controller.run(&site).await;
    assert_eq!(records[0].detail.description, "Build things. With us.");
}

// ─────────────────────── pagination ───────────────────────

#[tokio::test]
async fn processes_exactly_n_pages() {
    for n in 1..=4 {
        let site = linear_site(n);
        let mut controller = PaginationController::new(&config()).unwrap();
        let records = controller.run(&site).await;
        assert_eq!(controller.stats().pages_processed, n);
        assert_eq!(records.len(), n);
        assert_eq!(site.navigations(), n - 1);
    }
}

#[tokio::test]
async fn page_limit_stops_early() {
    let site = linear_site(5);
    let mut controller = PaginationController::new(&SiftConfig {
        max_pages: Some(2),
        ..config()
    })
    .unwrap();
    let records = controller.run(&site).await;
    assert_eq!(records.len(), 2);
    assert_eq!(site.navigations(), 1);
}

#[tokio::test]
async fn empty_results_page_yields_nothing() {
    let site = FakeSite::new(vec![page(vec![], false)]);
    let mut controller = PaginationController::new(&config()).unwrap();
    assert!(controller.run(&site).await.is_empty());
    assert_eq!(controller.stats().pages_processed, 1);
}

#[tokio::test]
async fn delays_come_from_configuration() {
    let site = two_page_site();
    let mut cfg = config();
    cfg.delays = DelayProfile {
        page_settle: DelayBounds::fixed(7),
        detail_settle: DelayBounds::fixed(3),
        next_page: DelayBounds::fixed(5),
    };
    let mut controller = PaginationController::new(&cfg).unwrap();
    controller.run(&site).await;
    // page 1: settle, detail(1); next; page 2: settle, detail(4), detail(5)
    assert_eq!(site.waits(), [7, 3, 5, 7, 3, 3]);
}

// ─────────────────────── failures ───────────────────────

#[tokio::test]
async fn failure_keeps_partial_results() {
    let site = two_page_site().failing_click_on("job_4");
    let mut controller = PaginationController::new(&config()).unwrap();

    let records = controller.run(&site).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].detail.title, "Frontend Engineer");
    let aborted = controller.stats().aborted.clone().unwrap();
    assert!(aborted.contains("job_4"));
    assert_eq!(site.detail_loads(), ["job_1"]);
    assert_eq!(controller.stats().detail_views_opened, 1);
}

#[tokio::test]
async fn missing_results_list_aborts_run() {
    let mut broken = page(vec![listing(1, "Frontend Engineer", "")], false);
    broken.has_results_list = false;
    let site = FakeSite::new(vec![broken]);
    let mut controller = PaginationController::new(&config()).unwrap();

    assert!(controller.run(&site).await.is_empty());
    assert!(controller
        .stats()
        .aborted
        .as_deref()
        .is_some_and(|e| e.contains("Required element missing")));
}

// ─────────────────────── listings ───────────────────────

#[tokio::test]
async fn missing_title_is_skipped_without_opening() {
    let mut untitled = listing(1, "", "");
    untitled.title = None;
    let site = FakeSite::new(vec![page(vec![untitled, listing(2, "Web Developer", "")], false)]);
    let mut controller = PaginationController::new(&config()).unwrap();

    let records = controller.run(&site).await;

    assert_eq!(records.len(), 1);
    assert_eq!(site.detail_loads(), ["job_2"]);
}

#[tokio::test]
async fn missing_company_does_not_drop_listing() {
    let mut anonymous = listing(1, "Frontend Engineer", "2-4 years in React");
    anonymous.snapshot.company = None;
    anonymous.snapshot.title = None;
    let site = FakeSite::new(vec![page(vec![anonymous], false)]);
    let mut controller = PaginationController::new(&config()).unwrap();

    let records = controller.run(&site).await;

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.detail.company, None);
    assert_eq!(record.detail.location.as_deref(), Some("New York, NY"));
    // falls back to the listing title
    assert_eq!(record.detail.title, "Frontend Engineer");
    assert!(!record.experience.minimum_met);
    assert_eq!(record.experience.minimum_years, 2);
    assert!(record.detail.date_posted.is_some());
}

#[tokio::test]
async fn invalid_config_is_rejected_up_front() {
    let mut cfg = config();
    cfg.delays.next_page = DelayBounds {
        min_ms: 10,
        max_ms: 1,
    };
    assert!(matches!(
        PaginationController::new(&cfg),
        Err(SiftError::Config(_))
    ));
}

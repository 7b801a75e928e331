//! jobsift — paginated job-listing traversal with title and experience filters.

pub mod config;
pub mod delay;
pub mod extract;
pub mod filter;
pub mod listing;
pub mod page;
pub mod pagination;
pub mod report;
pub mod scripts;
pub mod types;

pub use config::{DetailSelectors, Keywords, SiftConfig, SiteSelectors};
pub use delay::{DelayBounds, DelayProfile};
pub use extract::ExtractionRules;
pub use filter::{ExperienceFilter, TitleFilter, TitleVerdict};
pub use listing::ListingProcessor;
pub use page::PageController;
pub use pagination::PaginationController;
pub use report::{ReportAssembler, ReportColumns, ReportFormat, ReportSink};
pub use types::*;

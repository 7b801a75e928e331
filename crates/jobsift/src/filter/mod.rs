//! Listing filters: title relevance and experience requirements.

pub mod experience;
pub mod title;

pub use experience::ExperienceFilter;
pub use title::{TitleFilter, TitleVerdict};

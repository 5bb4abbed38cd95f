mod catalog;
mod jobs;
pub(crate) mod refresh;
mod tier_list;
mod translation;
mod uniques;

pub use catalog::{search_catalog, BuildSummary, CatalogService, SearchResults};
pub use jobs::{JobManager, JobState, JobStatus, JobTicket, ProgressEvent};
pub use refresh::{RefreshMode, RefreshService};
pub use tier_list::{ItemUsage, Tier, TierBucket, TierList};
pub use translation::{CanonicalName, ItemTranslator};
pub use uniques::TranslationTableService;

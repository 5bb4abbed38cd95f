mod clients;
mod scrapers;
mod storage;

pub use clients::page::{HttpFetcher, PageFetcher};
pub use scrapers::build_list::{fallback_builds, BuildListScraper};
pub use scrapers::uniques::{Locale, UniqueItemScraper};
pub use storage::fs_store::FileSystemStore;

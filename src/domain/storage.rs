use super::{BuildCatalog, BuildEntry, TranslationEntry};
use crate::error::Result;
use std::path::Path;

pub trait Storage: Send + Sync {
    /// `Ok(None)` when nothing has been persisted yet.
    fn load_catalog(&self) -> Result<Option<BuildCatalog>>;
    fn save_catalog(&self, catalog: &BuildCatalog) -> Result<()>;
    fn export_builds(&self, builds: &[BuildEntry], path: &Path) -> Result<()>;
    fn export_translations(&self, entries: &[TranslationEntry], path: &Path) -> Result<()>;
}

pub struct StorageKeys;

impl StorageKeys {
    pub const BUILDS_DATA: &'static str = "builds_data";
}

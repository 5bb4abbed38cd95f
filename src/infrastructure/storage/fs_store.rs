use crate::domain::storage::{Storage, StorageKeys};
use crate::domain::{BuildCatalog, BuildEntry, TranslationEntry};
use crate::error::{GearError, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct FileSystemStore {
    data_dir: PathBuf,
}

impl FileSystemStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn get_path_for_key(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    fn write_json_file<T: serde::Serialize + ?Sized>(&self, path: &Path, data: &T) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.ensure_dir(parent)?;
        }

        let content = serde_json::to_string_pretty(data)?;
        fs::write(path, content)
            .map_err(|e| GearError::Persistence(format!("{}: {}", path.display(), e)))
    }

    fn read_json_file<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(Some(serde_json::from_str(&content)?))
        } else {
            Ok(None)
        }
    }
}

impl Storage for FileSystemStore {
    fn load_catalog(&self) -> Result<Option<BuildCatalog>> {
        self.read_json_file(&self.get_path_for_key(StorageKeys::BUILDS_DATA))
    }

    fn save_catalog(&self, catalog: &BuildCatalog) -> Result<()> {
        self.write_json_file(&self.get_path_for_key(StorageKeys::BUILDS_DATA), catalog)
    }

    fn export_builds(&self, builds: &[BuildEntry], path: &Path) -> Result<()> {
        self.write_json_file(path, builds)
    }

    fn export_translations(&self, entries: &[TranslationEntry], path: &Path) -> Result<()> {
        self.write_json_file(path, entries)
    }
}

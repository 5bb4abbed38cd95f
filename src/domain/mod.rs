mod build;
mod catalog;
pub(crate) mod storage;
mod translation;

pub use build::{BuildEntry, EquipmentItem, ItemType, SearchMatch};
pub use catalog::BuildCatalog;
pub use translation::TranslationEntry;
pub use storage::{Storage, StorageKeys};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GearError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Fetch error for {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Selector error: {0}")]
    Selector(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GearError>;

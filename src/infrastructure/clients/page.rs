use crate::error::{GearError, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Source of rendered page markup. A headless browser can sit behind this
/// seam; the extraction code only ever sees the final markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GearError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        Ok(response.text().await?)
    }
}

use crate::config::cli::Args;
use crate::error::Result;
use clap::Parser;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

pub(crate) mod cli;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Settings the refresh pipeline needs, split from the CLI so tests can build them.
#[derive(Debug, Clone)]
pub struct ScraperSettings {
    pub base_url: String,
    pub request_delay: Duration,
}

impl ScraperSettings {
    pub fn builds_url(&self) -> String {
        format!("{}/d4/build-guides", self.base_url.trim_end_matches('/'))
    }
}

pub struct Config {
    pub args: Args,
    pub http_client: Client,
}

impl Config {
    pub fn new() -> Result<Self> {
        let args = Args::parse();

        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { args, http_client })
    }

    pub fn scraper_settings(&self) -> ScraperSettings {
        ScraperSettings {
            base_url: self.args.base_url.clone(),
            request_delay: Duration::from_millis(self.args.request_delay_ms),
        }
    }

    pub fn ensure_directories(&self) -> Result<()> {
        if !self.args.data_dir.exists() {
            std::fs::create_dir_all(&self.args.data_dir)?;
        }

        info!("Data dir {:?} exists", self.args.data_dir);
        Ok(())
    }
}

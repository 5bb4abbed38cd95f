use crate::config::cli::Command;
use crate::config::Config;
use crate::domain::{BuildCatalog, Storage};
use crate::error::Result;
use crate::extraction::EquipmentExtractionCascade;
use crate::infrastructure::{FileSystemStore, HttpFetcher};
use crate::progress::TerminalProgress;
use crate::server::AppState;
use crate::services::{
    search_catalog, CatalogService, ItemTranslator, JobManager, RefreshMode, RefreshService,
    TranslationTableService,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod domain;
mod error;
mod extraction;
mod infrastructure;
mod progress;
mod server;
mod services;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new()?;
    init_tracing(&config.args.log_level);
    config.ensure_directories()?;

    let store: Arc<dyn Storage> = Arc::new(FileSystemStore::new(&config.args.data_dir));
    let translator = Arc::new(ItemTranslator::load(&config.args.translations_file));
    let fetcher = Arc::new(HttpFetcher::new(config.http_client.clone()));
    let refresh = Arc::new(RefreshService::new(
        fetcher.clone(),
        store.clone(),
        EquipmentExtractionCascade::default(),
        config.scraper_settings(),
    ));

    match &config.args.command {
        Command::Serve { addr } => {
            let state = AppState {
                catalog: Arc::new(CatalogService::new(store, translator)),
                refresh,
                jobs: Arc::new(JobManager::new()),
            };
            server::serve(*addr, state).await?;
        }
        Command::Refresh { equipment_only } => {
            let mode = if *equipment_only {
                RefreshMode::Equipment
            } else {
                RefreshMode::Full
            };
            let catalog = refresh.run(mode, &mut TerminalProgress::new()).await?;
            info!("Refreshed {} builds", catalog.len());
        }
        Command::Search { query } => {
            let catalog = load_or_refresh(store.as_ref(), &refresh).await?;
            let results = search_catalog(&catalog, &translator, query);
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::ListBuilds { output } => {
            let builds = refresh.list_builds().await;
            store.export_builds(&builds, output)?;
            info!("Wrote {} builds to {:?}", builds.len(), output);
        }
        Command::ScrapeUniques {
            output,
            source,
            concurrency,
        } => {
            let service = TranslationTableService::new(fetcher, source, *concurrency);
            let entries = service.scrape(&mut TerminalProgress::new()).await?;
            store.export_translations(&entries, output)?;
            info!("Wrote {} item translations to {:?}", entries.len(), output);
        }
    }

    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// The persisted catalog, or a fresh scrape when there is nothing usable on disk.
async fn load_or_refresh(store: &dyn Storage, refresh: &RefreshService) -> Result<BuildCatalog> {
    match store.load_catalog() {
        Ok(Some(catalog)) if !catalog.is_empty() => return Ok(catalog),
        Ok(_) => warn!("No build data found, scraping first"),
        Err(e) => warn!("Build data unreadable ({}), scraping first", e),
    }
    refresh.run(RefreshMode::Full, &mut TerminalProgress::new()).await
}

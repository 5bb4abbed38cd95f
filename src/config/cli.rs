use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Directory holding the persisted build catalog
    #[arg(long, default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// JSON file with english/simplified/traditional item names
    #[arg(long, env = "GEARFINDER_TRANSLATIONS", default_value = "all_items.json", global = true)]
    pub translations_file: PathBuf,

    /// Base URL of the guide website
    #[arg(long, env = "GEARFINDER_BASE_URL", default_value = "https://maxroll.gg", global = true)]
    pub base_url: String,

    /// Pause after each processed build, in milliseconds
    #[arg(long, default_value_t = 1000, global = true)]
    pub request_delay_ms: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the search API
    Serve {
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: SocketAddr,
    },
    /// Scrape every build and its equipment into the catalog
    Refresh {
        /// Reuse the persisted build list and only re-extract equipment
        #[arg(long)]
        equipment_only: bool,
    },
    /// Print builds using a piece of equipment (any supported language)
    Search { query: String },
    /// Discover the build list and write it to a JSON file
    ListBuilds {
        #[arg(long, default_value = "all_builds.json")]
        output: PathBuf,
    },
    /// Build the item translation file from the unique-item database
    ScrapeUniques {
        #[arg(long, default_value = "all_items.json")]
        output: PathBuf,
        /// Base URL of the unique-item database
        #[arg(long, env = "GEARFINDER_UNIQUES_URL", default_value = "https://diablo4.cc")]
        source: String,
        /// Items fetched at the same time
        #[arg(long, default_value_t = 10)]
        concurrency: usize,
    },
}

//! pagelift command line.
//!
//! Operational front end for the page cache: warm the store the way a
//! browser session would, inspect it, or purge it. Logging goes to stderr
//! so stdout stays machine-readable.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use pagelift_client::fetch::{FetchConfig, HttpFetcher};
use pagelift_client::preload::Preloader;
use pagelift_core::store::{FRESH_WINDOW_MS, now_ms};
use pagelift_core::{AppConfig, EntryStore, SqliteArea, VersionCheck, VersionGuard, site};

#[derive(Debug, Parser)]
#[command(name = "pagelift")]
#[command(about = "Page cache and soft navigation for the docs site")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the version guard and a full preload cycle, then print status.
    Warm {
        /// Page to treat as currently displayed (never preloaded).
        #[arg(long, default_value = "index.html")]
        current: String,
    },
    /// Print the cache state for every known page.
    Status,
    /// Remove every cached entry, keeping the version marker.
    Purge,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let store = EntryStore::new(Arc::new(SqliteArea::open(&config.db_path).await?));

    match cli.command {
        Commands::Warm { current } => warm(&config, store, &current).await,
        Commands::Status => status(store).await,
        Commands::Purge => purge(store).await,
    }
}

async fn warm(config: &AppConfig, store: EntryStore, current: &str) -> Result<()> {
    let check = VersionGuard::new(store.clone(), site::CACHE_VERSION).ensure_current().await?;
    if let VersionCheck::Purged { previous, removed_keys } = &check {
        tracing::info!(
            "cache version now {}, purged {removed_keys} keys written under {}",
            site::CACHE_VERSION,
            previous.as_deref().unwrap_or("(none)")
        );
    }

    let fetcher = HttpFetcher::new(FetchConfig {
        base_url: config.site_url.clone(),
        user_agent: config.user_agent.clone(),
        timeout: config.timeout(),
    })?;

    let pages: Vec<String> = site::SITE_PAGES.iter().map(|p| (*p).to_string()).collect();
    let mut tasks = Preloader::new(store.clone(), Arc::new(fetcher), pages).spawn(current);
    while tasks.join_next().await.is_some() {}

    status(store).await
}

/// One row of `status` output.
#[derive(Debug, Serialize)]
struct PageStatus {
    page: String,
    cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    written_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    age_ms: Option<i64>,
    fresh: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<usize>,
}

async fn status(store: EntryStore) -> Result<()> {
    let now = now_ms();
    let mut rows = Vec::with_capacity(site::SITE_PAGES.len());

    for page in site::SITE_PAGES {
        let entry = store.read(page).await;
        let written_at = entry.as_ref().and_then(|e| e.written_at);
        rows.push(PageStatus {
            page: (*page).to_string(),
            cached: entry.is_some(),
            written_at,
            age_ms: written_at.map(|t| now - t),
            fresh: written_at.is_some_and(|t| now - t < FRESH_WINDOW_MS),
            bytes: entry.as_ref().map(|e| e.content.len()),
        });
    }

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

async fn purge(store: EntryStore) -> Result<()> {
    let removed_keys = store.purge_entries().await?;
    println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "removed_keys": removed_keys }))?);
    Ok(())
}

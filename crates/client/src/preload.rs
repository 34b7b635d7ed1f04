//! Background cache warming.
//!
//! One delayed fetch per known page other than the one on screen. The delay
//! is a fixed two seconds, not adaptive to network or device conditions.
//! Scheduled fetches fire independently and concurrently; the only gate is
//! the freshness check when the timer fires, so two nearby preload cycles
//! may both fetch the same page. The contract is eventual freshness, not
//! exactly-once fetching.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use pagelift_core::EntryStore;
use pagelift_core::store::now_ms;

use crate::fetch::{PageFetcher, warm_page};

/// Fixed delay between scheduling and the background fetches firing.
pub const PRELOAD_DELAY: Duration = Duration::from_millis(2000);

/// Schedules delayed background fetches for every known page except the
/// current one.
pub struct Preloader {
    store: EntryStore,
    fetcher: Arc<dyn PageFetcher>,
    pages: Vec<String>,
}

impl Preloader {
    pub fn new(store: EntryStore, fetcher: Arc<dyn PageFetcher>, pages: Vec<String>) -> Self {
        Self { store, fetcher, pages }
    }

    /// Schedule the warming tasks. Must be called within a tokio runtime.
    ///
    /// Returns the in-flight task set; callers may await it (CLI) or keep it
    /// alive alongside the session (embedders). Dropping the set aborts any
    /// work still pending; there is no cleanup contract.
    pub fn spawn(&self, current_page: &str) -> JoinSet<()> {
        let mut tasks = JoinSet::new();

        for page in &self.pages {
            if page == current_page {
                continue;
            }

            let page = page.clone();
            let store = self.store.clone();
            let fetcher = Arc::clone(&self.fetcher);
            tasks.spawn(async move {
                tokio::time::sleep(PRELOAD_DELAY).await;

                if store.is_fresh(&page, now_ms()).await {
                    tracing::debug!("{page} still fresh, skipping preload");
                    return;
                }

                if let Err(e) = warm_page(fetcher.as_ref(), &store, &page).await {
                    tracing::warn!("preload of {page} failed: {e}");
                }
            });
        }

        tasks
    }
}

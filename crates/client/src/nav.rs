//! Click interception and history handling.
//!
//! The interceptor converts clicks on recognized in-site links into
//! cache-backed document swaps. It never owns the DOM: the embedding shell
//! implements [`HostPage`] and routes its click and popstate events here,
//! performing whatever the returned outcome dictates. Side effects on a swap
//! happen in a fixed order: scroll recorded into the current history entry,
//! new entry pushed, document replaced, refresh scheduled.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use pagelift_core::EntryStore;

use crate::fetch::{PageFetcher, warm_page};

/// Delay before restoring scroll on back/forward, giving the swapped
/// document time to lay out.
pub const SCROLL_RESTORE_DELAY: Duration = Duration::from_millis(100);

/// History-state payload persisted into the browser history stack.
///
/// Serializes to `{"scrollY": n}` on entries that recorded an offset and
/// `{"fromCache": true}` on cache-originated entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
    #[serde(rename = "scrollY", default, skip_serializing_if = "Option::is_none")]
    pub scroll_y: Option<f64>,

    #[serde(rename = "fromCache", default, skip_serializing_if = "is_false")]
    pub from_cache: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// The document/history/scroll surface supplied by the embedding shell.
pub trait HostPage: Send + Sync {
    /// Replace the entire document, head and body, with `html`.
    fn replace_document(&self, html: &str);

    /// Push a new history entry for `url` carrying `state`.
    fn push_history(&self, url: &str, state: &HistoryState);

    /// Replace the current history entry's state in place, without pushing.
    fn replace_history_state(&self, state: &HistoryState);

    /// Current vertical scroll offset.
    fn scroll_y(&self) -> f64;

    /// Scroll the document to the given vertical offset.
    fn scroll_to(&self, y: f64);
}

/// What the host should do with the click it routed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Not intercepted; let the default navigation proceed.
    PassThrough,
    /// The document was swapped from cache; suppress the default navigation.
    Swapped,
}

/// Converts clicks on known in-site links into cache-backed swaps.
#[derive(Clone)]
pub struct NavInterceptor {
    store: EntryStore,
    fetcher: Arc<dyn PageFetcher>,
    host: Arc<dyn HostPage>,
    pages: Vec<String>,
}

impl NavInterceptor {
    pub fn new(store: EntryStore, fetcher: Arc<dyn PageFetcher>, host: Arc<dyn HostPage>, pages: Vec<String>) -> Self {
        Self { store, fetcher, host, pages }
    }

    /// Whether a link with this exact `href` gets a click handler.
    ///
    /// Only exact matches count: query strings, hashes, and relative-path
    /// variants fall through to normal navigation. The current page's own
    /// link is not excluded here; on a well-formed site it does not appear
    /// as a distinct nav target.
    pub fn intercepts(&self, href: &str) -> bool {
        self.pages.iter().any(|p| p == href)
    }

    /// Handle a click on a wired link.
    ///
    /// On a cache hit: records the current scroll offset into the current
    /// history entry (replaced in place), pushes a cache-originated entry
    /// for the target, swaps the whole document, and schedules a background
    /// refresh. The refresh is unconditional; freshness is not consulted.
    pub async fn handle_click(&self, href: &str) -> ClickOutcome {
        if !self.intercepts(href) {
            return ClickOutcome::PassThrough;
        }

        let Some(entry) = self.store.read(href).await else {
            return ClickOutcome::PassThrough;
        };

        self.host
            .replace_history_state(&HistoryState { scroll_y: Some(self.host.scroll_y()), from_cache: false });
        self.host
            .push_history(href, &HistoryState { scroll_y: None, from_cache: true });
        self.host.replace_document(&entry.content);

        let store = self.store.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let page = href.to_string();
        tokio::spawn(async move {
            if let Err(e) = warm_page(fetcher.as_ref(), &store, &page).await {
                tracing::warn!("post-swap refresh of {page} failed: {e}");
            }
        });

        ClickOutcome::Swapped
    }

    /// Handle a back/forward traversal.
    ///
    /// Restores the recorded scroll offset, if the arriving entry carries
    /// one, after [`SCROLL_RESTORE_DELAY`].
    pub async fn handle_popstate(&self, state: Option<HistoryState>) {
        let Some(y) = state.and_then(|s| s.scroll_y) else {
            return;
        };

        tokio::time::sleep(SCROLL_RESTORE_DELAY).await;
        self.host.scroll_to(y);
    }
}

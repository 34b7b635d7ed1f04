//! Session wiring.
//!
//! Encodes the startup ordering contract: the version guard's purge-or-keep
//! decision completes before any preload fetch is scheduled and before link
//! handlers exist, so everything downstream reads the post-purge store.

use std::sync::Arc;

use tokio::task::JoinSet;

use pagelift_core::{EntryStore, Error, VersionCheck, VersionGuard};

use crate::fetch::PageFetcher;
use crate::nav::{HostPage, NavInterceptor};
use crate::preload::Preloader;

/// A started cache/soft-navigation session.
pub struct Session {
    /// Interceptor the host routes click and popstate events through.
    pub nav: NavInterceptor,
    /// In-flight preload tasks. Await them to warm synchronously, or keep
    /// the set alive alongside the session; dropping it aborts pending work.
    pub preloads: JoinSet<()>,
    /// What the version guard decided at startup.
    pub version: VersionCheck,
}

impl Session {
    /// Run the startup sequence for one page load.
    ///
    /// `version` is [`pagelift_core::site::CACHE_VERSION`] in production
    /// wiring; `current_page` is derived from the active location and is
    /// excluded from preloading.
    pub async fn start(
        store: EntryStore, fetcher: Arc<dyn PageFetcher>, host: Arc<dyn HostPage>, pages: Vec<String>, version: &str,
        current_page: &str,
    ) -> Result<Self, Error> {
        let check = VersionGuard::new(store.clone(), version).ensure_current().await?;

        let preloads = Preloader::new(store.clone(), Arc::clone(&fetcher), pages.clone()).spawn(current_page);
        let nav = NavInterceptor::new(store, fetcher, host, pages);

        Ok(Self { nav, preloads, version: check })
    }
}

//! Cache epoch guard.
//!
//! Entries written under one site layout must never be interpreted under
//! another, so a persisted marker is compared against the compiled-in
//! version on every session start: any disagreement purges the whole
//! namespace before other cache logic runs. This is a one-shot check per
//! session, not a background watcher.

use crate::Error;
use crate::store::EntryStore;

/// Outcome of the one-shot version check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    /// The persisted marker matched; entries were left alone.
    Current,
    /// The marker was absent or stale; all entries were purged and the
    /// marker rewritten.
    Purged {
        previous: Option<String>,
        removed_keys: usize,
    },
}

/// Compares the persisted version marker against a compiled-in constant and
/// purges all entries on mismatch.
pub struct VersionGuard {
    store: EntryStore,
    version: String,
}

impl VersionGuard {
    /// In production wiring `version` is [`crate::site::CACHE_VERSION`];
    /// tests inject arbitrary strings to drive transitions.
    pub fn new(store: EntryStore, version: impl Into<String>) -> Self {
        Self { store, version: version.into() }
    }

    /// Run the purge-or-keep decision.
    ///
    /// Must complete before any preload fetch is scheduled and before link
    /// handlers are wired; callers that read the store afterwards observe
    /// the post-purge state.
    pub async fn ensure_current(&self) -> Result<VersionCheck, Error> {
        let marker = self.store.version_marker().await?;

        if marker.as_deref() == Some(self.version.as_str()) {
            return Ok(VersionCheck::Current);
        }

        let removed_keys = self.store.purge_entries().await?;
        self.store.set_version_marker(&self.version).await?;
        tracing::info!(
            "cache version moved {} -> {}, purged {removed_keys} keys",
            marker.as_deref().unwrap_or("(none)"),
            self.version
        );

        Ok(VersionCheck::Purged { previous: marker, removed_keys })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryArea;

    fn memory_store() -> EntryStore {
        EntryStore::new(Arc::new(MemoryArea::new()))
    }

    #[tokio::test]
    async fn test_first_run_writes_marker() {
        let store = memory_store();
        let guard = VersionGuard::new(store.clone(), "1.0.0");

        let check = guard.ensure_current().await.unwrap();
        assert_eq!(check, VersionCheck::Purged { previous: None, removed_keys: 0 });
        assert_eq!(store.version_marker().await.unwrap().as_deref(), Some("1.0.0"));
    }

    #[tokio::test]
    async fn test_matching_marker_keeps_entries() {
        let store = memory_store();
        store.set_version_marker("1.0.0").await.unwrap();
        store.write("docs.html", "<html></html>", 1).await.unwrap();

        let check = VersionGuard::new(store.clone(), "1.0.0").ensure_current().await.unwrap();
        assert_eq!(check, VersionCheck::Current);
        assert!(store.read("docs.html").await.is_some());
    }

    #[tokio::test]
    async fn test_version_bump_purges_entries() {
        let store = memory_store();
        store.set_version_marker("1.0.0").await.unwrap();
        store.write("install.html", "<html>v1</html>", 0).await.unwrap();

        let check = VersionGuard::new(store.clone(), "1.0.1").ensure_current().await.unwrap();
        assert_eq!(
            check,
            VersionCheck::Purged { previous: Some("1.0.0".into()), removed_keys: 2 }
        );
        assert!(store.read("install.html").await.is_none());
        assert_eq!(store.version_marker().await.unwrap().as_deref(), Some("1.0.1"));
    }

    #[tokio::test]
    async fn test_rerun_after_purge_is_a_no_op() {
        let store = memory_store();
        let guard = VersionGuard::new(store.clone(), "2.0.0");
        guard.ensure_current().await.unwrap();

        store.write("docs.html", "x", 1).await.unwrap();
        assert_eq!(guard.ensure_current().await.unwrap(), VersionCheck::Current);
        assert!(store.read("docs.html").await.is_some());
    }
}

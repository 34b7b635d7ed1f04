//! Cache entry read/write, freshness, purge, and eviction.
//!
//! An entry is a (content, stamp) key pair; the two are written together and
//! rolled back together, so readers never observe a page without its
//! timestamp key (a stamp that fails to parse is still reported, as
//! `written_at: None`).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Error, StorageArea, keys};

/// Freshness window. Entries younger than this are not re-fetched; older
/// entries are still served, they just stop suppressing fetches.
pub const FRESH_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// A cached page: complete HTML document text plus its write timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub page: String,
    pub content: String,
    /// Epoch milliseconds at write time. `None` when the persisted stamp is
    /// missing or unparsable.
    pub written_at: Option<i64>,
}

/// Versioned entry persistence over an injected [`StorageArea`].
///
/// Cheap to clone; clones share the underlying area.
#[derive(Clone)]
pub struct EntryStore {
    area: Arc<dyn StorageArea>,
}

impl EntryStore {
    pub fn new(area: Arc<dyn StorageArea>) -> Self {
        Self { area }
    }

    /// Read the cached entry for `page`.
    ///
    /// Never fails: absence is a normal outcome, and backend errors are
    /// logged and reported as absence so callers degrade to default
    /// navigation.
    pub async fn read(&self, page: &str) -> Option<CacheEntry> {
        let content = match self.area.get(&keys::content_key(page)).await {
            Ok(Some(content)) => content,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!("read of {page} failed, treating as miss: {e}");
                return None;
            }
        };

        let written_at = self.stamp(page).await;
        Some(CacheEntry { page: page.to_string(), content, written_at })
    }

    /// Persist `content` and its timestamp for `page`, replacing any
    /// previous entry.
    ///
    /// On a quota rejection the half-written pair is rolled back, one
    /// eviction pass runs, and [`Error::QuotaExceeded`] is reported. The
    /// write is not retried here; the next preload or refresh cycle retries
    /// naturally.
    pub async fn write(&self, page: &str, content: &str, written_at: i64) -> Result<(), Error> {
        if let Err(e) = self.area.set(&keys::content_key(page), content).await {
            return self.fail_write(page, e).await;
        }

        if let Err(e) = self.area.set(&keys::stamp_key(page), &written_at.to_string()).await {
            // Content and stamp land together or not at all.
            if let Err(remove_err) = self.area.remove(&keys::content_key(page)).await {
                tracing::debug!("rollback of {page} content failed: {remove_err}");
            }
            return self.fail_write(page, e).await;
        }

        Ok(())
    }

    /// Whether `page` has an entry young enough to suppress a fetch.
    pub async fn is_fresh(&self, page: &str, now_ms: i64) -> bool {
        match self.stamp(page).await {
            Some(written_at) => now_ms - written_at < FRESH_WINDOW_MS,
            None => false,
        }
    }

    /// Remove every content and stamp key, leaving the version marker in
    /// place for the guard to overwrite. Returns the number of keys removed.
    pub async fn purge_entries(&self) -> Result<usize, Error> {
        let mut removed = 0;
        for key in self.area.keys().await? {
            if keys::is_entry_key(&key) {
                self.area.remove(&key).await?;
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::info!("purged {removed} cache keys");
        }
        Ok(removed)
    }

    /// Evict the oldest `ceil(N/2)` of the N entries with a parsable stamp.
    ///
    /// Entries whose stamp does not parse are excluded from scoring and
    /// remain; when no entry has a parsable stamp nothing is evicted, even
    /// if the store is full. Returns the number of entries evicted.
    pub async fn evict_oldest_half(&self) -> Result<usize, Error> {
        let mut stamped: Vec<(i64, String)> = Vec::new();
        for key in self.area.keys().await? {
            let Some(page) = keys::page_of_stamp_key(&key) else {
                continue;
            };
            let Some(written_at) = self.area.get(&key).await?.and_then(|v| v.parse().ok()) else {
                continue;
            };
            stamped.push((written_at, page.to_string()));
        }

        if stamped.is_empty() {
            return Ok(0);
        }

        stamped.sort();
        let doomed = stamped.len().div_ceil(2);
        for (_, page) in stamped.into_iter().take(doomed) {
            self.area.remove(&keys::content_key(&page)).await?;
            self.area.remove(&keys::stamp_key(&page)).await?;
        }

        Ok(doomed)
    }

    /// Read the persisted cache version marker, if any.
    pub async fn version_marker(&self) -> Result<Option<String>, Error> {
        self.area.get(keys::VERSION_KEY).await
    }

    /// Overwrite the persisted cache version marker.
    pub async fn set_version_marker(&self, version: &str) -> Result<(), Error> {
        self.area.set(keys::VERSION_KEY, version).await
    }

    async fn stamp(&self, page: &str) -> Option<i64> {
        self.area
            .get(&keys::stamp_key(page))
            .await
            .ok()
            .flatten()
            .and_then(|v| v.parse().ok())
    }
}

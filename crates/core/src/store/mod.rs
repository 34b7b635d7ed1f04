//! Versioned key-value persistence for cached pages.
//!
//! The storage primitive is the [`StorageArea`] trait: an origin-scoped,
//! string-keyed area in the shape of browser local storage. Two backends are
//! provided, [`MemoryArea`] for tests and non-durable embedders and
//! [`SqliteArea`] for durable on-disk state. [`EntryStore`] layers the cache
//! semantics (paired content/stamp writes, freshness, purge, eviction) on
//! top of whichever area is injected.

pub mod entries;
pub mod keys;
pub mod memory;
pub mod migrations;
pub mod sqlite;

use async_trait::async_trait;

pub use crate::Error;

pub use entries::{CacheEntry, EntryStore, FRESH_WINDOW_MS};
pub use memory::MemoryArea;
pub use sqlite::SqliteArea;

/// Durable, origin-scoped string key-value storage.
///
/// Models the browser-local storage area the cache persists into. A missing
/// key reads as `Ok(None)`; writes may be rejected with
/// [`Error::QuotaExceeded`] when the backend is out of capacity.
#[async_trait]
pub trait StorageArea: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), Error>;

    /// Enumerate every key currently present in the area.
    async fn keys(&self) -> Result<Vec<String>, Error>;
}

/// Current wall-clock time as epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

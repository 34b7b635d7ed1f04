//! Namespaced key layout for the storage area.
//!
//! Three key families share the `pagelift:` namespace: a single version
//! marker, one content key per page, and one timestamp key per page.
//! Content and stamp keys are what `purge_entries` and eviction operate on;
//! the version marker is owned by the version guard.

/// Key holding the persisted cache version marker.
pub const VERSION_KEY: &str = "pagelift:version";

const CONTENT_PREFIX: &str = "pagelift:page:";
const STAMP_PREFIX: &str = "pagelift:stamp:";

/// Key holding a page's cached HTML.
pub fn content_key(page: &str) -> String {
    format!("{CONTENT_PREFIX}{page}")
}

/// Key holding a page's write timestamp (epoch milliseconds, decimal string).
pub fn stamp_key(page: &str) -> String {
    format!("{STAMP_PREFIX}{page}")
}

/// Whether a raw storage key belongs to a cache entry (content or stamp).
pub fn is_entry_key(key: &str) -> bool {
    key.starts_with(CONTENT_PREFIX) || key.starts_with(STAMP_PREFIX)
}

/// Extract the page identifier from a stamp key.
pub fn page_of_stamp_key(key: &str) -> Option<&str> {
    key.strip_prefix(STAMP_PREFIX)
}

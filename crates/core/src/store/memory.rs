//! In-memory storage area.
//!
//! Backs tests and embedders that do not need durability. The optional byte
//! quota reproduces the capacity behavior of a real browser storage area so
//! the eviction path can be exercised deterministically.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Error, StorageArea};

/// `HashMap`-backed storage area with an optional byte budget.
#[derive(Debug, Default)]
pub struct MemoryArea {
    items: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryArea {
    /// Create an unbounded in-memory area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an area that rejects writes once stored keys and values would
    /// exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self { items: Mutex::new(HashMap::new()), quota_bytes: Some(quota_bytes) }
    }

    /// Bytes currently stored (keys plus values).
    pub fn used_bytes(&self) -> usize {
        let items = self.items.lock().expect("storage area mutex poisoned");
        items.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

#[async_trait]
impl StorageArea for MemoryArea {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let items = self.items.lock().expect("storage area mutex poisoned");
        Ok(items.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut items = self.items.lock().expect("storage area mutex poisoned");

        if let Some(quota) = self.quota_bytes {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = used + key.len() + value.len();
            if needed > quota {
                return Err(Error::QuotaExceeded(format!("{} bytes over budget writing {key}", needed - quota)));
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        let mut items = self.items.lock().expect("storage area mutex poisoned");
        items.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        let items = self.items.lock().expect("storage area mutex poisoned");
        Ok(items.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing() {
        let area = MemoryArea::new();
        assert_eq!(area.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let area = MemoryArea::new();
        area.set("k", "v").await.unwrap();
        assert_eq!(area.get("k").await.unwrap().as_deref(), Some("v"));

        area.remove("k").await.unwrap();
        assert_eq!(area.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_quota_rejects_oversize_write() {
        let area = MemoryArea::with_quota(8);
        area.set("a", "123").await.unwrap();

        let err = area.set("b", "too big to fit").await.unwrap_err();
        assert!(err.is_quota());

        // The rejected write must not have landed.
        assert_eq!(area.get("b").await.unwrap(), None);
        assert_eq!(area.get("a").await.unwrap().as_deref(), Some("123"));
    }

    #[tokio::test]
    async fn test_quota_counts_replacement_not_double() {
        let area = MemoryArea::with_quota(8);
        area.set("a", "1234567").await.unwrap();
        // Replacing the only value frees its old bytes first.
        area.set("a", "7654321").await.unwrap();
        assert_eq!(area.used_bytes(), 8);
    }
}

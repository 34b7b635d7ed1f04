//! Page fetching.
//!
//! A fetch is a plain GET of a page path joined onto the site base URL: a
//! success status and a text body, nothing more. The trait seam exists so
//! the preloader and interceptor can run against a scripted fetcher in
//! tests; production wiring uses [`HttpFetcher`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Url};

use pagelift_core::store::now_ms;
use pagelift_core::{EntryStore, Error};

/// Configuration for the HTTP page fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL of the site; page paths are joined onto it.
    pub base_url: String,

    /// User agent string (default: "pagelift/0.1")
    pub user_agent: String,

    /// Request timeout (default: 10s)
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/".to_string(),
            user_agent: "pagelift/0.1".to_string(),
            timeout: Duration::from_millis(10_000),
        }
    }
}

/// Fetches the full HTML document for a known page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET the page and return its body text. Non-success statuses and
    /// transport errors are both [`Error::HttpError`].
    async fn fetch(&self, page: &str) -> Result<String, Error>;
}

/// reqwest-backed fetcher for production wiring.
pub struct HttpFetcher {
    http: Client,
    base: Url,
}

impl HttpFetcher {
    /// Create a fetcher with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let base = Url::parse(&config.base_url).map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, page: &str) -> Result<String, Error> {
        let start = Instant::now();
        let url = self
            .base
            .join(page)
            .map_err(|e| Error::InvalidUrl(format!("{page}: {e}")))?;

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::HttpError(format!("network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::HttpError(format!("failed to read response: {e}")))?;

        tracing::debug!(
            "fetched {url} in {}ms ({} bytes)",
            start.elapsed().as_millis(),
            body.len()
        );

        Ok(body)
    }
}

/// Fetch `page` and write the verbatim body into the store, stamped now.
///
/// Shared by the preloader and the interceptor's post-swap refresh. A quota
/// rejection has already run its eviction pass inside the store by the time
/// the error reaches the caller.
pub async fn warm_page(fetcher: &dyn PageFetcher, store: &EntryStore, page: &str) -> Result<(), Error> {
    let body = fetcher.fetch(page).await?;
    store.write(page, &body, now_ms()).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pagelift_core::MemoryArea;

    use super::*;
    use crate::testing::ScriptedFetcher;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8080/");
        assert_eq!(config.user_agent, "pagelift/0.1");
        assert_eq!(config.timeout, Duration::from_millis(10_000));
    }

    #[test]
    fn test_http_fetcher_rejects_bad_base_url() {
        let config = FetchConfig { base_url: "not a url".into(), ..Default::default() };
        assert!(matches!(HttpFetcher::new(config), Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_http_fetcher_new() {
        assert!(HttpFetcher::new(FetchConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_warm_page_writes_verbatim_body() {
        let store = EntryStore::new(Arc::new(MemoryArea::new()));
        let fetcher = ScriptedFetcher::new();
        fetcher.respond("docs.html", "<html>docs</html>");

        warm_page(&fetcher, &store, "docs.html").await.unwrap();

        let entry = store.read("docs.html").await.unwrap();
        assert_eq!(entry.content, "<html>docs</html>");
        assert!(entry.written_at.is_some());
    }

    #[tokio::test]
    async fn test_warm_page_failure_leaves_page_uncached() {
        let store = EntryStore::new(Arc::new(MemoryArea::new()));
        let fetcher = ScriptedFetcher::new();

        let err = warm_page(&fetcher, &store, "docs.html").await.unwrap_err();
        assert!(matches!(err, Error::HttpError(_)));
        assert!(store.read("docs.html").await.is_none());
    }
}

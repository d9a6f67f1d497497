//! TTL-bounded memoization layer over outbound HTTP GETs
//!
//! Provides a `FetchCache` that deduplicates upstream requests: the first
//! successful fetch of a URL stores the parsed JSON body with an expiry
//! timestamp, and later requests for the exact same URL are served from
//! memory until the entry expires. Expired entries are evicted lazily on
//! read; there is no background sweep.
//!
//! The map is unbounded for the life of the process. The addon was designed
//! for short-lived serverless instances where this is fine; a long-lived
//! deployment should front this with a size-bounded map.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use reqwest::{header, Client};
use serde_json::Value;
use thiserror::Error;

/// Time-to-live for cached upstream responses in hours
const CACHE_TTL_HOURS: i64 = 6;

/// Maximum length (in characters) of the response-body snippet carried in a
/// status error, for diagnostics
const ERROR_SNIPPET_CHARS: usize = 200;

/// User-Agent sent with every outbound request
const USER_AGENT: &str = concat!("ratingsmeta/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when fetching an upstream JSON document
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP transport failed before a response was received
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("upstream returned {status} for {url}: {snippet}")]
    Status {
        status: u16,
        url: String,
        /// Response body truncated to at most 200 characters
        snippet: String,
    },

    /// Response body was not valid JSON
    #[error("failed to parse upstream response as JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single cached upstream response
struct CacheEntry {
    value: Value,
    expires_at: DateTime<Utc>,
}

/// Seam between the resolver and the network, so resolution logic can be
/// exercised against canned responses in tests.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and parse the body as JSON, consulting the cache first.
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        (**self).fetch_json(url).await
    }
}

/// In-memory cache of upstream JSON responses, keyed on the full request URL.
///
/// The URL is an opaque key: two textually different URLs for the same
/// logical resource are cached separately. Callers rely on constructing
/// identical URLs for identical resources, which keeps the hit rate high and
/// upstream providers off our back. Do not normalize.
pub struct FetchCache {
    client: Client,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchCache {
    /// Creates a cache with the production TTL of 6 hours.
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(CACHE_TTL_HOURS))
    }

    /// Creates a cache with a custom TTL. Used by tests to exercise expiry
    /// without waiting six hours.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            client: Client::new(),
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of entries currently held (expired entries count until a read
    /// evicts them).
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns the live entry for `url`, evicting it instead if expired.
    fn lookup(&self, url: &str) -> Option<Value> {
        let now = Utc::now();
        {
            let entries = self.entries.read();
            match entries.get(url) {
                Some(entry) if now <= entry.expires_at => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Expired: evict on read.
        self.entries.write().remove(url);
        None
    }

    fn store(&self, url: &str, value: Value) {
        let entry = CacheEntry {
            value,
            expires_at: Utc::now() + self.ttl,
        };
        self.entries.write().insert(url.to_string(), entry);
    }

    /// Returns the cached JSON document for `url`, fetching it upstream on a
    /// cold or expired entry.
    ///
    /// Failed fetches are never cached. The lock is not held across I/O, so
    /// concurrent requests for the same cold URL may each fetch upstream;
    /// last write wins and both callers get a valid response.
    pub async fn get(&self, url: &str) -> Result<Value, FetchError> {
        if let Some(hit) = self.lookup(url) {
            tracing::debug!(%url, "cache hit");
            return Ok(hit);
        }

        tracing::debug!(%url, "cache miss, fetching upstream");
        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                snippet: truncate(&body, ERROR_SNIPPET_CHARS),
            });
        }

        let value: Value = serde_json::from_str(&body)?;
        self.store(url, value.clone());
        Ok(value)
    }
}

#[async_trait]
impl Fetcher for FetchCache {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        self.get(url).await
    }
}

/// Truncates `text` to at most `max` characters, respecting char boundaries.
fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

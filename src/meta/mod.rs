//! Meta resolution pipeline
//!
//! Fetches the canonical metadata record from Cinemeta and, when an MDBList
//! API key is configured, layers a ratings block into its description. The
//! ratings leg is strictly best-effort: no failure there may ever surface to
//! the client. The Cinemeta leg is the feature itself, so its failure
//! degrades the whole request to `{ "meta": null }`.

pub mod ratings;

use serde::Serialize;
use serde_json::Value;

use crate::cache::Fetcher;
use crate::config::Config;
use self::ratings::RatingsSnapshot;

/// The record handed back to the addon framework for serialization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetaResponse {
    pub meta: Option<Value>,
}

/// Resolves `(type, id)` requests against the two upstream providers.
///
/// Generic over [`Fetcher`] so tests can drive it with canned responses; in
/// production it holds a [`crate::cache::FetchCache`].
pub struct MetaResolver<F> {
    fetcher: F,
    cinemeta_base: String,
    mdblist_base: String,
    api_key: Option<String>,
}

impl<F: Fetcher> MetaResolver<F> {
    pub fn new(fetcher: F, config: &Config) -> Self {
        Self {
            fetcher,
            cinemeta_base: config.cinemeta_base.clone(),
            mdblist_base: config.mdblist_base.clone(),
            api_key: config.mdblist_api_key.clone(),
        }
    }

    /// Whether ratings enrichment is active (an API key is configured).
    pub fn ratings_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn meta_url(&self, content_type: &str, id: &str) -> String {
        format!(
            "{}/meta/{}/{}.json",
            self.cinemeta_base,
            urlencoding::encode(content_type),
            urlencoding::encode(id)
        )
    }

    fn ratings_url(&self, api_key: &str, id: &str) -> String {
        format!(
            "{}/?apikey={}&i={}",
            self.mdblist_base,
            urlencoding::encode(api_key),
            urlencoding::encode(id)
        )
    }

    /// Produces the merged metadata record for one request.
    ///
    /// Single attempt per upstream call, no retries. Every path returns a
    /// well-formed response; nothing here propagates an error to the caller.
    pub async fn resolve(&self, content_type: &str, id: &str) -> MetaResponse {
        let primary = match self.fetcher.fetch_json(&self.meta_url(content_type, id)).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%content_type, %id, error = %err, "primary metadata fetch failed");
                return MetaResponse { meta: None };
            }
        };

        // No usable record means nothing to enrich.
        let mut meta = match primary.get("meta") {
            Some(value) if !value.is_null() => value.clone(),
            _ => return MetaResponse { meta: None },
        };

        let Some(api_key) = &self.api_key else {
            return MetaResponse { meta: Some(meta) };
        };

        let snapshot = match self.fetcher.fetch_json(&self.ratings_url(api_key, id)).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%id, error = %err, "ratings fetch failed, serving record without enrichment");
                return MetaResponse { meta: Some(meta) };
            }
        };

        if let Some(block) = RatingsSnapshot::from_response(&snapshot).format_block() {
            prepend_ratings(&mut meta, &block);
        }
        MetaResponse { meta: Some(meta) }
    }
}

/// Puts the ratings block at the top of the record's description, separated
/// from the existing text by a blank line.
fn prepend_ratings(meta: &mut Value, block: &str) {
    let original = meta
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("");
    let merged = format!("{block}\n\n{original}").trim().to_string();
    if let Some(record) = meta.as_object_mut() {
        record.insert("description".to_string(), Value::String(merged));
    }
}

//! Integration tests for the meta resolution pipeline
//!
//! Drives the resolver with a stub fetcher so every fallback branch can be
//! exercised without a network: missing key, ratings-provider failures,
//! malformed payloads, and the merge itself.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use ratingsmeta::cache::{FetchError, Fetcher};
use ratingsmeta::config::Config;
use ratingsmeta::meta::MetaResolver;

/// Canned reply for one URL.
enum Canned {
    Json(Value),
    Status(u16, &'static str),
    Garbage,
}

/// Records every URL the resolver asks for and answers from a fixed table.
/// Unknown URLs get a 404, which keeps accidental extra fetches visible.
#[derive(Default)]
struct StubFetcher {
    responses: HashMap<String, Canned>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    fn new() -> Self {
        Self::default()
    }

    fn respond(mut self, url: &str, canned: Canned) -> Self {
        self.responses.insert(url.to_string(), canned);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        self.calls.lock().push(url.to_string());
        match self.responses.get(url) {
            Some(Canned::Json(value)) => Ok(value.clone()),
            Some(Canned::Status(status, body)) => Err(FetchError::Status {
                status: *status,
                url: url.to_string(),
                snippet: body.to_string(),
            }),
            Some(Canned::Garbage) => {
                Err(serde_json::from_str::<Value>("not json{").unwrap_err().into())
            }
            None => Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
                snippet: String::new(),
            }),
        }
    }
}

const META_URL: &str = "https://cinemeta.test/meta/movie/tt0133093.json";
const RATINGS_URL: &str = "https://mdblist.test/api/?apikey=secret&i=tt0133093";

fn config_without_key() -> Config {
    Config {
        mdblist_api_key: None,
        cinemeta_base: "https://cinemeta.test".to_string(),
        mdblist_base: "https://mdblist.test/api".to_string(),
    }
}

fn config_with_key() -> Config {
    Config {
        mdblist_api_key: Some("secret".to_string()),
        ..config_without_key()
    }
}

fn primary_response() -> Value {
    json!({ "meta": { "id": "tt0133093", "name": "The Matrix", "description": "Plot." } })
}

fn resolver(
    config: Config,
    fetcher: StubFetcher,
) -> (MetaResolver<Arc<StubFetcher>>, Arc<StubFetcher>) {
    let fetcher = Arc::new(fetcher);
    (MetaResolver::new(Arc::clone(&fetcher), &config), fetcher)
}

#[tokio::test]
async fn without_key_the_description_is_returned_byte_identical() {
    let stub = StubFetcher::new().respond(META_URL, Canned::Json(primary_response()));
    let (resolver, fetcher) = resolver(config_without_key(), stub);

    let response = resolver.resolve("movie", "tt0133093").await;

    let meta = response.meta.unwrap();
    assert_eq!(meta["description"], "Plot.");
    assert_eq!(fetcher.calls(), vec![META_URL.to_string()]);
}

#[tokio::test]
async fn ratings_status_failure_is_masked() {
    let stub = StubFetcher::new()
        .respond(META_URL, Canned::Json(primary_response()))
        .respond(RATINGS_URL, Canned::Status(500, "mdblist down"));
    let (resolver, _) = resolver(config_with_key(), stub);

    let response = resolver.resolve("movie", "tt0133093").await;

    assert_eq!(response.meta.unwrap()["description"], "Plot.");
}

#[tokio::test]
async fn ratings_parse_failure_is_masked() {
    let stub = StubFetcher::new()
        .respond(META_URL, Canned::Json(primary_response()))
        .respond(RATINGS_URL, Canned::Garbage);
    let (resolver, _) = resolver(config_with_key(), stub);

    let response = resolver.resolve("movie", "tt0133093").await;

    assert_eq!(response.meta.unwrap()["description"], "Plot.");
}

#[tokio::test]
async fn ratings_block_is_prepended_to_the_description() {
    let stub = StubFetcher::new()
        .respond(META_URL, Canned::Json(primary_response()))
        .respond(
            RATINGS_URL,
            Canned::Json(json!({ "imdb": 8.5, "tomato": 94, "metacritic": null })),
        );
    let (resolver, fetcher) = resolver(config_with_key(), stub);

    let response = resolver.resolve("movie", "tt0133093").await;

    let meta = response.meta.unwrap();
    assert_eq!(
        meta["description"],
        "Ratings\nIMDb: 8.5\nRotten Tomatoes: 94%\n\nPlot."
    );
    // The rest of the record passes through untouched.
    assert_eq!(meta["name"], "The Matrix");
    assert_eq!(
        fetcher.calls(),
        vec![META_URL.to_string(), RATINGS_URL.to_string()]
    );
}

#[tokio::test]
async fn snapshot_with_no_recognized_fields_leaves_description_untouched() {
    let stub = StubFetcher::new()
        .respond(META_URL, Canned::Json(primary_response()))
        .respond(RATINGS_URL, Canned::Json(json!({ "trakt": null, "imdb": "" })));
    let (resolver, _) = resolver(config_with_key(), stub);

    let response = resolver.resolve("movie", "tt0133093").await;

    assert_eq!(response.meta.unwrap()["description"], "Plot.");
}

#[tokio::test]
async fn primary_failure_yields_null_meta_and_skips_ratings() {
    let stub = StubFetcher::new().respond(META_URL, Canned::Status(502, "bad gateway"));
    let (resolver, fetcher) = resolver(config_with_key(), stub);

    let response = resolver.resolve("movie", "tt0133093").await;

    assert!(response.meta.is_none());
    assert_eq!(
        fetcher.calls(),
        vec![META_URL.to_string()],
        "ratings provider must not be called after a primary failure"
    );
}

#[tokio::test]
async fn primary_response_without_meta_yields_null_and_skips_ratings() {
    let stub = StubFetcher::new().respond(META_URL, Canned::Json(json!({ "meta": null })));
    let (resolver, fetcher) = resolver(config_with_key(), stub);

    let response = resolver.resolve("movie", "tt0133093").await;

    assert!(response.meta.is_none());
    assert_eq!(fetcher.calls(), vec![META_URL.to_string()]);
}

#[tokio::test]
async fn record_without_description_gets_just_the_block() {
    let stub = StubFetcher::new()
        .respond(
            META_URL,
            Canned::Json(json!({ "meta": { "id": "tt0133093", "name": "The Matrix" } })),
        )
        .respond(RATINGS_URL, Canned::Json(json!({ "imdb": 8.5 })));
    let (resolver, _) = resolver(config_with_key(), stub);

    let response = resolver.resolve("movie", "tt0133093").await;

    assert_eq!(response.meta.unwrap()["description"], "Ratings\nIMDb: 8.5");
}

#[tokio::test]
async fn type_and_id_are_url_encoded() {
    let stub = StubFetcher::new();
    let (resolver, fetcher) = resolver(config_with_key(), stub);

    // Nothing canned: both legs fail, which is fine. The interesting part is
    // the URL the resolver asked for.
    let response = resolver.resolve("movie", "tt+strange id").await;

    assert!(response.meta.is_none());
    assert_eq!(
        fetcher.calls(),
        vec!["https://cinemeta.test/meta/movie/tt%2Bstrange%20id.json".to_string()]
    );
}

#[tokio::test]
async fn nested_ratings_shape_wins_over_flat_fields() {
    let stub = StubFetcher::new()
        .respond(META_URL, Canned::Json(primary_response()))
        .respond(
            RATINGS_URL,
            Canned::Json(json!({ "imdb": "1.0", "ratings": { "imdb": "9.0" } })),
        );
    let (resolver, _) = resolver(config_with_key(), stub);

    let response = resolver.resolve("movie", "tt0133093").await;

    assert_eq!(
        response.meta.unwrap()["description"],
        "Ratings\nIMDb: 9.0\n\nPlot."
    );
}

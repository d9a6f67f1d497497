//! HTTP layer
//!
//! Thin axum router around the resolver: the manifest, the meta endpoint,
//! and two auxiliary endpoints (liveness probe and a debug echo). CORS is
//! wide open, as Stremio clients fetch addon endpoints cross-origin.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

use crate::cache::FetchCache;
use crate::config::Config;
use crate::manifest::{manifest, Manifest};
use crate::meta::{MetaResolver, MetaResponse};

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<MetaResolver<FetchCache>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let resolver = MetaResolver::new(FetchCache::new(), &config);
        Self {
            resolver: Arc::new(resolver),
            config: Arc::new(config),
        }
    }
}

/// Anything escaping a handler is turned into a structured JSON payload with
/// a non-success status instead of tearing the process down.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "err": self.to_string() }))).into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/manifest.json", get(serve_manifest))
        .route("/meta/{content_type}/{id}", get(serve_meta))
        .route("/health", get(health))
        .route("/debug", get(debug_info))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

/// Binds `addr` and serves the addon until the process is stopped.
pub async fn run_server(addr: SocketAddr, config: Config) -> std::io::Result<()> {
    let state = AppState::new(config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "serving addon");
    axum::serve(listener, app).await
}

async fn serve_manifest() -> Json<Manifest> {
    Json(manifest())
}

/// The meta endpoint proper. Stremio requests `/meta/{type}/{id}.json`; the
/// suffix is stripped here so the resolver sees the bare id, and a request
/// without the suffix is answered the same way.
async fn serve_meta(
    State(state): State<AppState>,
    Path((content_type, id)): Path<(String, String)>,
) -> Json<MetaResponse> {
    let id = id.strip_suffix(".json").map(str::to_string).unwrap_or(id);
    tracing::info!(%content_type, %id, "meta request");
    Json(state.resolver.resolve(&content_type, &id).await)
}

/// Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "version": env!("CARGO_PKG_VERSION") }))
}

/// Echoes runtime facts for troubleshooting. The API key itself is never
/// included, only whether one is configured.
async fn debug_info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "ratingsEnabled": state.resolver.ratings_enabled(),
        "cinemetaBase": state.config.cinemeta_base,
        "mdblistBase": state.config.mdblist_base,
        "exampleManifest": "/manifest.json",
        "exampleMeta": "/meta/movie/tt0111161.json",
    }))
}

async fn not_found() -> AppError {
    AppError::NotFound
}

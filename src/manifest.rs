//! Stremio addon manifest
//!
//! Static descriptor published at `/manifest.json`. Stremio expects camelCase
//! keys on the wire.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: &'static str,
    pub version: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub resources: Vec<&'static str>,
    pub types: Vec<&'static str>,
    pub catalogs: Vec<serde_json::Value>,
    pub id_prefixes: Vec<&'static str>,
    pub behavior_hints: BehaviorHints,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    pub configurable: bool,
    pub configuration_required: bool,
}

/// The addon's manifest: a meta-only addon for IMDb-prefixed movie and
/// series ids, with no catalogs of its own.
pub fn manifest() -> Manifest {
    Manifest {
        id: "org.ratingsmeta.description",
        version: env!("CARGO_PKG_VERSION"),
        name: "MDBList Ratings (Description)",
        description: "Layers MDBList ratings (IMDb/TMDb/Trakt/RT/Metacritic and friends) into the summary description for movies and series.",
        resources: vec!["meta"],
        types: vec!["movie", "series"],
        catalogs: vec![],
        id_prefixes: vec!["tt"],
        behavior_hints: BehaviorHints {
            configurable: false,
            configuration_required: false,
        },
    }
}

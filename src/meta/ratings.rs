//! Ratings snapshot normalization and block formatting
//!
//! MDBList answers either with rating fields at the top level or nested under
//! a `ratings` object, depending on account settings and endpoint. Responses
//! are normalized into a [`RatingsSnapshot`] up front so the formatter never
//! has to sniff shapes.

use serde_json::Value;

/// Recognized rating fields pulled out of an MDBList response.
///
/// Each field holds the display string for that source, or `None` when the
/// source reported nothing. JSON `null`, missing keys, and empty strings all
/// count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingsSnapshot {
    pub imdb: Option<String>,
    pub tmdb: Option<String>,
    pub trakt: Option<String>,
    pub letterboxd: Option<String>,
    pub tomato: Option<String>,
    pub metacritic: Option<String>,
}

impl RatingsSnapshot {
    /// Normalizes an MDBList response of either shape.
    ///
    /// A non-empty `ratings` sub-object takes precedence over top-level
    /// fields; otherwise the response itself is the source.
    pub fn from_response(response: &Value) -> Self {
        let source = match response.get("ratings") {
            Some(nested) if nested.as_object().is_some_and(|map| !map.is_empty()) => nested,
            _ => response,
        };

        Self {
            imdb: display_value(source.get("imdb")),
            tmdb: display_value(source.get("tmdb")),
            trakt: display_value(source.get("trakt")),
            letterboxd: display_value(source.get("letterboxd")),
            tomato: display_value(source.get("tomato")),
            metacritic: display_value(source.get("metacritic")),
        }
    }

    /// Renders the snapshot as a multi-line block headed by `"Ratings"`, or
    /// `None` when no recognized rating is present.
    ///
    /// Lines appear in fixed order (IMDb, TMDb, Trakt, Letterboxd, Rotten
    /// Tomatoes, Metacritic) regardless of the order fields appeared in the
    /// response. Rotten Tomatoes values get a `%` appended unless they
    /// already carry one.
    pub fn format_block(&self) -> Option<String> {
        let mut lines = Vec::new();

        if let Some(value) = &self.imdb {
            lines.push(format!("IMDb: {value}"));
        }
        if let Some(value) = &self.tmdb {
            lines.push(format!("TMDb: {value}"));
        }
        if let Some(value) = &self.trakt {
            lines.push(format!("Trakt: {value}"));
        }
        if let Some(value) = &self.letterboxd {
            lines.push(format!("Letterboxd: {value}"));
        }
        if let Some(value) = &self.tomato {
            if value.contains('%') {
                lines.push(format!("Rotten Tomatoes: {value}"));
            } else {
                lines.push(format!("Rotten Tomatoes: {value}%"));
            }
        }
        if let Some(value) = &self.metacritic {
            lines.push(format!("Metacritic: {value}"));
        }

        if lines.is_empty() {
            return None;
        }
        Some(format!("Ratings\n{}", lines.join("\n")))
    }
}

/// String form of a scalar rating value. Null, missing, empty-string, and
/// structured values all map to `None`.
fn display_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

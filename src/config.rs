//! Process configuration
//!
//! Everything comes from environment variables. The MDBList key is a feature
//! flag by presence: without it the addon serves plain Cinemeta records and
//! never errors on that account.

/// Default base URL for the Cinemeta metadata provider
pub const CINEMETA_BASE_URL: &str = "https://v3-cinemeta.strem.io";

/// Default base URL for the MDBList ratings API
pub const MDBLIST_BASE_URL: &str = "https://mdblist.com/api";

#[derive(Debug, Clone)]
pub struct Config {
    /// MDBList API key; `None` disables ratings enrichment entirely
    pub mdblist_api_key: Option<String>,
    /// Base URL for the primary metadata provider
    pub cinemeta_base: String,
    /// Base URL for the ratings provider
    pub mdblist_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mdblist_api_key: None,
            cinemeta_base: CINEMETA_BASE_URL.to_string(),
            mdblist_base: MDBLIST_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Reads configuration from the environment.
    ///
    /// `MDBLIST_API_KEY` enables enrichment; `CINEMETA_BASE_URL` and
    /// `MDBLIST_BASE_URL` override the provider endpoints (useful for
    /// pointing the addon at test doubles).
    pub fn from_env() -> Self {
        Self {
            mdblist_api_key: env_non_empty("MDBLIST_API_KEY"),
            cinemeta_base: env_non_empty("CINEMETA_BASE_URL")
                .unwrap_or_else(|| CINEMETA_BASE_URL.to_string()),
            mdblist_base: env_non_empty("MDBLIST_BASE_URL")
                .unwrap_or_else(|| MDBLIST_BASE_URL.to_string()),
        }
    }
}

/// Reads an environment variable, treating unset and blank the same way.
fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

//! Engine configuration types.

use serde::{Deserialize, Serialize};

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default city for requests that do not name one.
    #[serde(default = "default_city")]
    pub city: String,

    /// Default ISO 3166 country code.
    #[serde(default = "default_country")]
    pub country: String,

    /// Snapshot cache behavior.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Data source settings.
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Snapshot cache parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Max age for a cached snapshot before it is considered stale (seconds).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Overall deadline for one refresh cycle across all sources (seconds).
    #[serde(default = "default_refresh_timeout")]
    pub refresh_timeout_secs: u64,

    /// Serve the previous same-city snapshot when a refresh fails,
    /// instead of surfacing the error.
    #[serde(default)]
    pub serve_stale_on_error: bool,
}

/// Data source parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// OpenWeatherMap API key. Empty means mock weather data.
    #[serde(default)]
    pub openweather_api_key: String,

    /// Per-request HTTP timeout (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_city() -> String {
    "London".into()
}

fn default_country() -> String {
    "GB".into()
}

fn default_ttl() -> u64 {
    300
}

fn default_refresh_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            refresh_timeout_secs: default_refresh_timeout(),
            serve_stale_on_error: false,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            openweather_api_key: String::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            country: default_country(),
            cache: CacheConfig::default(),
            sources: SourcesConfig::default(),
        }
    }
}

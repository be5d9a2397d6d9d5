//! OpenWeatherMap current-conditions source.
//!
//! Fetches live data from `api.openweathermap.org` when an API key is
//! configured and falls back to a fixed mock fragment otherwise (or on any
//! request failure), so the fetch contract never fails.

use common::config::SourcesConfig;
use common::{Error, WeatherFragment};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{ContextSource, SourceCache, SOURCE_TTL_SECS};

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Weather source with connection pooling and a local fragment cache.
pub struct WeatherSource {
    client: reqwest::Client,
    api_key: String,
    cache: SourceCache<WeatherFragment>,
}

// ── OpenWeatherMap response types ─────────────────────────────────────

#[derive(Debug, Deserialize)]
struct OwmResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    sys: Option<OwmSys>,
    #[serde(default)]
    main: Option<OwmMain>,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    #[serde(default)]
    wind: Option<OwmWind>,
    #[serde(default)]
    visibility: Option<i64>,
    #[serde(default)]
    clouds: Option<OwmClouds>,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    #[serde(default)]
    temp: Option<f64>,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    humidity: Option<i64>,
    #[serde(default)]
    pressure: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    #[serde(default)]
    description: String,
    #[serde(default)]
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    #[serde(default)]
    speed: Option<f64>,
    #[serde(default)]
    deg: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwmClouds {
    #[serde(default)]
    all: Option<i64>,
}

// ── Implementation ────────────────────────────────────────────────────

impl WeatherSource {
    pub fn new(cfg: &SourcesConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("city-context/0.1")
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .expect("failed to build weather HTTP client");

        Self {
            client,
            api_key: cfg.openweather_api_key.clone(),
            cache: SourceCache::new(SOURCE_TTL_SECS),
        }
    }

    async fn fetch_live(&self, city: &str, country: &str) -> Result<WeatherFragment, Error> {
        let query = [
            ("q", format!("{},{}", city, country)),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ];

        debug!("Fetching OpenWeather conditions for {},{}", city, country);

        let resp = self
            .client
            .get(BASE_URL)
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::Http(format!("HTTP error for {}: {}", city, e)))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http(format!(
                "OpenWeather returned {} for {}: {}",
                status,
                city,
                truncate_body(&body, 500)
            )));
        }

        let data: OwmResponse = resp
            .json()
            .await
            .map_err(|e| Error::Http(format!("JSON parse error for {}: {}", city, e)))?;

        Ok(map_response(data, city, country))
    }

    /// Fixed fragment served when the API is unavailable or unconfigured.
    fn mock_fragment(city: &str, country: &str) -> WeatherFragment {
        WeatherFragment {
            city: city.to_string(),
            country: country.to_string(),
            temperature: Some(15.5),
            feels_like: Some(14.2),
            humidity: Some(65),
            pressure: Some(1013),
            description: "partly cloudy".into(),
            main_condition: "Clouds".into(),
            wind_speed: Some(3.5),
            wind_direction: Some(180),
            visibility: Some(10000),
            cloudiness: Some(40),
        }
    }
}

/// Truncate an error body for logging without splitting a code point.
fn truncate_body(body: &str, max_chars: usize) -> &str {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

fn map_response(data: OwmResponse, city: &str, country: &str) -> WeatherFragment {
    let (description, main_condition) = data
        .weather
        .into_iter()
        .next()
        .map(|c| (c.description, c.main))
        .unwrap_or_default();

    WeatherFragment {
        city: data.name.unwrap_or_else(|| city.to_string()),
        country: data
            .sys
            .and_then(|s| s.country)
            .unwrap_or_else(|| country.to_string()),
        temperature: data.main.as_ref().and_then(|m| m.temp),
        feels_like: data.main.as_ref().and_then(|m| m.feels_like),
        humidity: data.main.as_ref().and_then(|m| m.humidity),
        pressure: data.main.as_ref().and_then(|m| m.pressure),
        description,
        main_condition,
        wind_speed: data.wind.as_ref().and_then(|w| w.speed),
        wind_direction: data.wind.as_ref().and_then(|w| w.deg),
        visibility: data.visibility,
        cloudiness: data.clouds.and_then(|c| c.all),
    }
}

impl ContextSource for WeatherSource {
    type Fragment = WeatherFragment;

    const NAME: &'static str = "weather";

    async fn fetch(&self, city: &str, country: &str) -> common::Result<WeatherFragment> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }

        if self.api_key.is_empty() {
            return Ok(Self::mock_fragment(city, country));
        }

        // Only live data enters the cache; a mock substitute would pin
        // degraded data for the whole TTL and stop the API from retrying.
        match self.fetch_live(city, country).await {
            Ok(fragment) => {
                self.cache.put(fragment.clone());
                Ok(fragment)
            }
            Err(e) => {
                warn!("Weather fetch failed for {}, serving mock data: {}", city, e);
                Ok(Self::mock_fragment(city, country))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::SourcesConfig;

    fn sample_response() -> &'static str {
        r#"{
            "name": "London",
            "sys": {"country": "GB"},
            "main": {"temp": 17.3, "feels_like": 16.8, "humidity": 72, "pressure": 1008},
            "weather": [{"description": "light rain", "main": "Rain"}],
            "wind": {"speed": 5.1, "deg": 220},
            "visibility": 8000,
            "clouds": {"all": 90}
        }"#
    }

    #[test]
    fn test_map_response() {
        let parsed: OwmResponse =
            serde_json::from_str(sample_response()).expect("response should deserialize");
        let frag = map_response(parsed, "London", "GB");

        assert_eq!(frag.city, "London");
        assert_eq!(frag.country, "GB");
        assert_eq!(frag.temperature, Some(17.3));
        assert_eq!(frag.description, "light rain");
        assert_eq!(frag.main_condition, "Rain");
        assert_eq!(frag.cloudiness, Some(90));
    }

    #[test]
    fn test_map_response_tolerates_missing_fields() {
        let parsed: OwmResponse = serde_json::from_str("{}").expect("empty object parses");
        let frag = map_response(parsed, "London", "GB");

        assert_eq!(frag.city, "London");
        assert_eq!(frag.country, "GB");
        assert!(frag.temperature.is_none());
        assert!(frag.description.is_empty());
    }

    #[test]
    fn test_truncate_body_keeps_char_boundaries() {
        let degrees = "°".repeat(600);
        let cut = truncate_body(&degrees, 500);
        assert_eq!(cut.chars().count(), 500);

        assert_eq!(truncate_body("short ascii body", 500), "short ascii body");
        assert_eq!(truncate_body("", 500), "");
    }

    #[tokio::test]
    async fn test_failed_live_fetch_does_not_cache_mock() {
        let cfg = SourcesConfig {
            openweather_api_key: "not-a-real-key".into(),
            request_timeout_secs: 5,
        };
        let source = WeatherSource::new(&cfg);

        // Rejected key (or no network at all) lands on the mock path.
        let frag = source.fetch("London", "GB").await.expect("never fails");
        assert_eq!(frag.temperature, Some(15.5));

        // The mock must not occupy the cache slot, so the next fetch
        // retries the API instead of replaying degraded data.
        assert!(source.cache.get().is_none());
    }

    #[tokio::test]
    async fn test_fetch_without_key_serves_mock() {
        let source = WeatherSource::new(&SourcesConfig::default());
        let frag = source.fetch("London", "GB").await.expect("never fails");

        assert_eq!(frag.city, "London");
        assert_eq!(frag.temperature, Some(15.5));
        assert_eq!(frag.description, "partly cloudy");
    }
}

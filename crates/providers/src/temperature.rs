//! Derived temperature source.
//!
//! Temperature comes from the same upstream as weather; this source
//! re-fetches via its own weather client and enriches the reading with
//! comfort bands, clothing advice, and a wind-chill estimate.

use common::config::SourcesConfig;
use common::{TemperatureFragment, TemperatureRange, WeatherFragment};

use crate::{ContextSource, SourceCache, WeatherSource, SOURCE_TTL_SECS};

pub struct TemperatureSource {
    weather: WeatherSource,
    cache: SourceCache<TemperatureFragment>,
}

impl TemperatureSource {
    pub fn new(cfg: &SourcesConfig) -> Self {
        Self {
            weather: WeatherSource::new(cfg),
            cache: SourceCache::new(SOURCE_TTL_SECS),
        }
    }
}

/// Clothing advice for a temperature band.
fn recommendation_for(temp: f64) -> &'static str {
    if temp < 0.0 {
        "Very cold! Dress warmly with multiple layers."
    } else if temp < 10.0 {
        "Cold weather. Wear a warm jacket."
    } else if temp < 18.0 {
        "Cool weather. A light jacket would be comfortable."
    } else if temp < 25.0 {
        "Pleasant temperature. Light clothing is recommended."
    } else if temp < 30.0 {
        "Warm weather. Light and breathable clothing."
    } else {
        "Hot weather! Stay hydrated and wear light, loose clothing."
    }
}

/// Simplified wind-chill: no effect below 5 m/s, then half a degree per m/s.
fn wind_chill(temp: f64, wind_speed: f64) -> f64 {
    if wind_speed < 5.0 {
        return temp;
    }
    ((temp - wind_speed * 0.5) * 10.0).round() / 10.0
}

fn build_fragment(weather: &WeatherFragment, city: &str, country: &str) -> TemperatureFragment {
    let temp = weather.temperature.unwrap_or(0.0);
    let feels_like = weather.feels_like.unwrap_or(temp);

    TemperatureFragment {
        city: if weather.city.is_empty() {
            city.to_string()
        } else {
            weather.city.clone()
        },
        country: if weather.country.is_empty() {
            country.to_string()
        } else {
            weather.country.clone()
        },
        current_temperature: temp,
        feels_like_temperature: feels_like,
        temperature_unit: "celsius".into(),
        temperature_range: TemperatureRange {
            comfortable: (18.0..=25.0).contains(&temp),
            too_cold: temp < 10.0,
            too_hot: temp > 30.0,
        },
        recommendation: recommendation_for(temp).into(),
        humidity: weather.humidity,
        wind_chill_factor: wind_chill(temp, weather.wind_speed.unwrap_or(0.0)),
    }
}

impl ContextSource for TemperatureSource {
    type Fragment = TemperatureFragment;

    const NAME: &'static str = "temperature";

    async fn fetch(&self, city: &str, country: &str) -> common::Result<TemperatureFragment> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }

        let weather = self.weather.fetch(city, country).await?;
        let fragment = build_fragment(&weather, city, country);

        self.cache.put(fragment.clone());
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather_with(temp: f64, wind: f64) -> WeatherFragment {
        WeatherFragment {
            city: "London".into(),
            country: "GB".into(),
            temperature: Some(temp),
            feels_like: Some(temp - 1.0),
            humidity: Some(65),
            pressure: Some(1013),
            description: "clear sky".into(),
            main_condition: "Clear".into(),
            wind_speed: Some(wind),
            wind_direction: Some(180),
            visibility: Some(10000),
            cloudiness: Some(10),
        }
    }

    #[test]
    fn test_recommendation_bands() {
        assert!(recommendation_for(-5.0).starts_with("Very cold"));
        assert!(recommendation_for(5.0).starts_with("Cold weather"));
        assert!(recommendation_for(15.0).starts_with("Cool weather"));
        assert!(recommendation_for(20.0).starts_with("Pleasant"));
        assert!(recommendation_for(27.0).starts_with("Warm weather"));
        assert!(recommendation_for(35.0).starts_with("Hot weather"));
    }

    #[test]
    fn test_wind_chill_below_threshold_is_identity() {
        assert_eq!(wind_chill(10.0, 4.9), 10.0);
    }

    #[test]
    fn test_wind_chill_applies_above_threshold() {
        assert_eq!(wind_chill(10.0, 6.0), 7.0);
        // Rounded to one decimal.
        assert_eq!(wind_chill(10.0, 5.3), 7.4);
    }

    #[test]
    fn test_build_fragment_bands() {
        let frag = build_fragment(&weather_with(20.0, 2.0), "London", "GB");
        assert!(frag.temperature_range.comfortable);
        assert!(!frag.temperature_range.too_cold);
        assert!(!frag.temperature_range.too_hot);
        assert_eq!(frag.temperature_unit, "celsius");
        assert_eq!(frag.wind_chill_factor, 20.0);

        let cold = build_fragment(&weather_with(3.0, 0.0), "London", "GB");
        assert!(cold.temperature_range.too_cold);

        let hot = build_fragment(&weather_with(33.0, 0.0), "London", "GB");
        assert!(hot.temperature_range.too_hot);
    }

    #[test]
    fn test_build_fragment_defaults_missing_temp_to_zero() {
        let mut weather = weather_with(0.0, 0.0);
        weather.temperature = None;
        weather.feels_like = None;

        let frag = build_fragment(&weather, "London", "GB");
        assert_eq!(frag.current_temperature, 0.0);
        assert_eq!(frag.feels_like_temperature, 0.0);
    }
}

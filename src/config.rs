//! Configuration loader — merges env vars, .env file, and config.toml.

use common::config::EngineConfig;
use common::Error;
use std::path::Path;

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn parse_bool(raw: &str) -> bool {
    let lowered = raw.trim().to_ascii_lowercase();
    lowered != "0" && lowered != "false" && lowered != "no" && lowered != "off"
}

fn validate_config(config: &EngineConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.city.trim().is_empty() {
        issues.push("city must not be empty".into());
    }
    if config.country.trim().len() != 2 {
        issues.push("country must be a 2-letter ISO code".into());
    }
    if config.cache.ttl_secs == 0 {
        issues.push("cache.ttl_secs must be > 0".into());
    }
    if config.cache.refresh_timeout_secs == 0 {
        issues.push("cache.refresh_timeout_secs must be > 0".into());
    }
    if config.sources.request_timeout_secs == 0 {
        issues.push("sources.request_timeout_secs must be > 0".into());
    }
    if config.sources.request_timeout_secs > config.cache.refresh_timeout_secs {
        issues.push(
            "sources.request_timeout_secs must be <= cache.refresh_timeout_secs".into(),
        );
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load engine configuration from environment and optional config file.
pub fn load_config() -> Result<EngineConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = EngineConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(city) = std::env::var("CITY_CONTEXT_CITY") {
        config.city = city;
    }
    if let Ok(country) = std::env::var("CITY_CONTEXT_COUNTRY") {
        config.country = country;
    }
    if let Ok(raw) = std::env::var("CITY_CONTEXT_TTL_SECS") {
        config.cache.ttl_secs = parse_positive_u64(&raw, "CITY_CONTEXT_TTL_SECS")?;
    }
    if let Ok(raw) = std::env::var("CITY_CONTEXT_REFRESH_TIMEOUT_SECS") {
        config.cache.refresh_timeout_secs =
            parse_positive_u64(&raw, "CITY_CONTEXT_REFRESH_TIMEOUT_SECS")?;
    }
    if let Ok(raw) = std::env::var("CITY_CONTEXT_SERVE_STALE") {
        config.cache.serve_stale_on_error = parse_bool(&raw);
    }
    if let Ok(key) = std::env::var("OPENWEATHER_API_KEY") {
        config.sources.openweather_api_key = key;
    }

    // 5. Validate.
    validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_country_code() {
        let mut config = EngineConfig::default();
        config.country = "GBR".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let mut config = EngineConfig::default();
        config.cache.ttl_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("Yes"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool("FALSE"));
    }

    #[test]
    fn test_parse_positive_u64() {
        assert_eq!(parse_positive_u64("300", "X").unwrap(), 300);
        assert!(parse_positive_u64("0", "X").is_err());
        assert!(parse_positive_u64("abc", "X").is_err());
    }
}

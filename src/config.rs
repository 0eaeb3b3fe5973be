//! Process configuration.
//!
//! Sourced from environment variables (a `.env` file is honored by the
//! binary before this runs):
//! - `GEMINI_API_KEY` - Required. Key for the Gemini model endpoint.
//! - `WEATHER_API_KEY` - Required. Key for WeatherAPI.com.
//! - `GEMINI_MODEL` - Optional. Model name. Defaults to `gemini-2.0-flash`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `MAX_ITERATIONS` - Optional. Agent loop bound. Defaults to `10`.
//!
//! Both keys are loaded once at startup; a missing or blank key is fatal
//! before any request is served.

use crate::agent::DEFAULT_MAX_ITERATIONS;
use crate::llm::gemini::DEFAULT_MODEL;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Key for the Gemini OpenAI-compatible endpoint
    pub gemini_api_key: String,

    /// Key for WeatherAPI.com
    pub weather_api_key: String,

    /// Gemini model name
    pub model: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if either required key is unset
    /// or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source. Split out from
    /// `from_env` so the startup guard is testable without touching the
    /// process environment.
    pub fn build(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let gemini_api_key = require(&lookup, "GEMINI_API_KEY")?;
        let weather_api_key = require(&lookup, "WEATHER_API_KEY")?;

        let model = lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{e}")))?;

        let max_iterations = lookup("MAX_ITERATIONS")
            .map(|v| {
                v.parse::<usize>().map_err(|e| {
                    ConfigError::InvalidValue("MAX_ITERATIONS".to_string(), format!("{e}"))
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_ITERATIONS);

        Ok(Self {
            gemini_api_key,
            weather_api_key,
            model,
            host,
            port,
            max_iterations,
        })
    }
}

/// A required secret: present and non-blank, or a fatal config error.
fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, ConfigError> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn build_from(map: HashMap<String, String>) -> Result<Config, ConfigError> {
        Config::build(|name| map.get(name).cloned())
    }

    #[test]
    fn loads_with_both_keys_and_defaults() {
        let config = build_from(vars(&[
            ("GEMINI_API_KEY", "llm-key"),
            ("WEATHER_API_KEY", "weather-key"),
        ]))
        .unwrap();
        assert_eq!(config.gemini_api_key, "llm-key");
        assert_eq!(config.weather_api_key, "weather-key");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn missing_gemini_key_is_fatal() {
        let err = build_from(vars(&[("WEATHER_API_KEY", "weather-key")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(name) if name == "GEMINI_API_KEY"));
    }

    #[test]
    fn missing_weather_key_is_fatal() {
        let err = build_from(vars(&[("GEMINI_API_KEY", "llm-key")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(name) if name == "WEATHER_API_KEY"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = build_from(vars(&[
            ("GEMINI_API_KEY", "llm-key"),
            ("WEATHER_API_KEY", "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(name) if name == "WEATHER_API_KEY"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = build_from(vars(&[
            ("GEMINI_API_KEY", "llm-key"),
            ("WEATHER_API_KEY", "weather-key"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(name, _) if name == "PORT"));
    }

    #[test]
    fn overrides_are_honored() {
        let config = build_from(vars(&[
            ("GEMINI_API_KEY", "llm-key"),
            ("WEATHER_API_KEY", "weather-key"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("PORT", "8080"),
            ("MAX_ITERATIONS", "4"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_iterations, 4);
    }
}

//! Weather lookup against WeatherAPI.com.
//!
//! One outbound GET per lookup, no retries, no caching. The city string is
//! passed through to the provider unmodified; whether it resolves is the
//! provider's call, not ours.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// WeatherAPI.com v1 base URL.
pub const WEATHER_API_BASE: &str = "https://api.weatherapi.com/v1";

/// Per-request timeout. A stalled provider should fail the lookup, not hang
/// the agent run.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Current conditions for one city. Transient: exists only to be formatted
/// into the tool's text output.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub condition: String,
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "🌍 Location: {}\n🌡️ Temperature: {}°C (Feels like {}°C)\n☁️ Condition: {}",
            self.location, self.temperature_c, self.feels_like_c, self.condition
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("weather provider unreachable for '{city}': {source}")]
    Transport {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("weather provider returned status {status} for '{city}'")]
    Status {
        city: String,
        status: reqwest::StatusCode,
    },

    #[error("weather provider returned an unreadable body for '{city}': {source}")]
    Decode {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no current conditions for '{city}'")]
    UnknownCity { city: String },
}

impl LookupError {
    /// The city string the failed lookup was asked about.
    pub fn city(&self) -> &str {
        match self {
            Self::Transport { city, .. }
            | Self::Status { city, .. }
            | Self::Decode { city, .. }
            | Self::UnknownCity { city } => city,
        }
    }

    /// Plain-text rendering for the model. All failure classes read the
    /// same to the end user: the city could not be resolved.
    pub fn user_message(&self) -> String {
        format!(
            "❌ Couldn't find weather data for {}. Please check the city name.",
            self.city()
        )
    }
}

/// Client for the provider's "current conditions" endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: WEATHER_API_BASE.to_string(),
        }
    }

    /// Override the provider base URL. Used by tests to point at a mock
    /// server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch current conditions for `city`.
    ///
    /// Succeeds only when the provider answers with a success status AND the
    /// body carries both the `location` and `current` sections; everything
    /// else (unreachable provider, error status, unknown city) is a
    /// `LookupError` carrying the original city string.
    pub async fn lookup(&self, city: &str) -> Result<WeatherReport, LookupError> {
        let url = format!("{}/current.json", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .timeout(LOOKUP_TIMEOUT)
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .send()
            .await
            .map_err(|source| LookupError::Transport {
                city: city.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                city: city.to_string(),
                status,
            });
        }

        let body: CurrentResponse =
            response
                .json()
                .await
                .map_err(|source| LookupError::Decode {
                    city: city.to_string(),
                    source,
                })?;

        match (body.location, body.current) {
            (Some(location), Some(current)) => Ok(WeatherReport {
                location: location.name,
                temperature_c: current.temp_c,
                feels_like_c: current.feelslike_c,
                condition: current.condition.text,
            }),
            _ => Err(LookupError::UnknownCity {
                city: city.to_string(),
            }),
        }
    }
}

// Body shape of GET /v1/current.json. The provider signals an unknown city
// with an `error` object instead of these sections, so both are optional.
#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: Option<LocationBlock>,
    current: Option<CurrentBlock>,
}

#[derive(Debug, Deserialize)]
struct LocationBlock {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temp_c: f64,
    feelslike_c: f64,
    condition: ConditionBlock,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    text: String,
}

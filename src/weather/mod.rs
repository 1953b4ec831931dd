//! Weather resolution: current conditions with a staleness cutoff.
//!
//! Weather is only meaningful for an entry whose effective timestamp is close
//! to "now": the upstream API reports current conditions and historical
//! lookups are out of scope. Entries dated more than three hours in the past
//! therefore skip the lookup entirely, without contacting the service.

use crate::constants;
use crate::errors::{AppResult, ResolveError};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Weather conditions as they will appear in the entry record.
///
/// Values are carried as already-formatted strings: humidity as a fraction
/// (`0.62`), temperature in Fahrenheit rounded to two decimals. Every field
/// is optional so manual overrides can fill in any subset; absent fields
/// render as the store format's `nan` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Weather {
    /// Relative humidity as a fraction of 1.
    pub humidity: Option<String>,
    /// Temperature in degrees Fahrenheit.
    pub temperature: Option<String>,
    /// Short sky condition label (e.g. "Clear", "Rain").
    pub skyline: Option<String>,
    /// Longer textual description (e.g. "Scattered Clouds").
    pub description: Option<String>,
}

/// Returns true when weather may be attached to an entry with the given
/// effective timestamp.
///
/// The cutoff is strictly "more than three hours before now"; entries dated
/// in the future still get current conditions.
///
/// # Examples
///
/// ```
/// use dayly::weather::within_staleness_window;
///
/// let now = 1_700_000_000;
/// assert!(within_staleness_window(now, now));
/// assert!(within_staleness_window(now - 3 * 3600, now));
/// assert!(!within_staleness_window(now - 3 * 3600 - 1, now));
/// ```
pub fn within_staleness_window(effective_epoch: i64, now_epoch: i64) -> bool {
    now_epoch - effective_epoch <= constants::STALENESS_WINDOW_SECS
}

/// Normalizes a manual temperature override into degrees Fahrenheit.
///
/// A trailing `C` converts from Celsius (rounded to two decimals), a trailing
/// `F` is stripped, anything else passes through verbatim.
pub fn normalize_temperature(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(celsius) = trimmed.strip_suffix(['C', 'c']) {
        if let Ok(c) = celsius.trim().parse::<f64>() {
            return format_rounded(32.0 + c * 9.0 / 5.0);
        }
    }
    if let Some(fahrenheit) = trimmed.strip_suffix(['F', 'f']) {
        if let Ok(f) = fahrenheit.trim().parse::<f64>() {
            return format_rounded(f);
        }
    }
    trimmed.to_string()
}

/// Normalizes a manual humidity override into a fraction of 1.
///
/// A trailing `%` divides by 100; anything else passes through verbatim.
pub fn normalize_humidity(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(percent) = trimmed.strip_suffix('%') {
        if let Ok(p) = percent.trim().parse::<f64>() {
            return (p / 100.0).to_string();
        }
    }
    trimmed.to_string()
}

/// Rounds to two decimals and formats without trailing zeros.
fn format_rounded(value: f64) -> String {
    ((value * 100.0).round() / 100.0).to_string()
}

/// Capitalizes each whitespace-separated word ("scattered clouds" -> "Scattered Clouds").
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `weather` array element of the current-conditions response.
#[derive(Debug, Deserialize)]
struct ConditionEntry {
    main: String,
    description: String,
}

/// `main` object of the current-conditions response.
#[derive(Debug, Deserialize)]
struct MainReadings {
    /// Temperature in Kelvin
    temp: f64,
    /// Relative humidity in percent
    humidity: f64,
}

/// Current-conditions response, reduced to the fields we consume.
#[derive(Debug, Deserialize)]
struct CurrentConditions {
    weather: Vec<ConditionEntry>,
    main: MainReadings,
}

/// Client for the OpenWeatherMap current-conditions API.
pub struct WeatherClient {
    base_url: String,
    api_key: String,
    language: String,
    client: Client,
}

impl WeatherClient {
    /// Creates a new weather client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the API (e.g. "http://api.openweathermap.org")
    /// * `api_key` - OpenWeatherMap API key
    /// * `language` - Two-letter language code for the description text
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(constants::HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            language: language.into(),
            client,
        })
    }

    /// Fetches current conditions for the given coordinates, honoring the
    /// staleness window.
    ///
    /// Returns `Ok(None)` without contacting the service when the effective
    /// timestamp is more than three hours before `now_epoch`.
    ///
    /// # Errors
    ///
    /// Returns a `ResolveError` (wrapped in `AppError`) if the request fails
    /// or the response cannot be interpreted. Callers treat this as
    /// non-fatal and omit the weather section.
    pub fn resolve(
        &self,
        latitude: &str,
        longitude: &str,
        effective_epoch: i64,
        now_epoch: i64,
    ) -> AppResult<Option<Weather>> {
        if !within_staleness_window(effective_epoch, now_epoch) {
            debug!(
                "Entry timestamp is {}s old, past the staleness window; skipping weather",
                now_epoch - effective_epoch
            );
            return Ok(None);
        }
        self.current(latitude, longitude).map(Some)
    }

    /// Queries current conditions for the given coordinates.
    fn current(&self, latitude: &str, longitude: &str) -> AppResult<Weather> {
        debug!("Fetching weather for ({}, {})", latitude, longitude);

        let url = format!("{}{}", self.base_url, constants::OWM_WEATHER_PATH);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", latitude),
                ("lon", longitude),
                ("appid", self.api_key.as_str()),
                ("lang", self.language.as_str()),
            ])
            .send()
            .map_err(ResolveError::Transport)?;

        if !response.status().is_success() {
            return Err(ResolveError::Status {
                service: "weather",
                status: response.status().as_u16(),
            }
            .into());
        }

        let conditions: CurrentConditions = response.json().map_err(|e| {
            ResolveError::InvalidResponse {
                service: "weather",
                detail: format!("failed to parse response: {}", e),
            }
        })?;

        let condition = conditions.weather.first().ok_or_else(|| {
            ResolveError::InvalidResponse {
                service: "weather",
                detail: "empty weather condition list".to_string(),
            }
        })?;

        let fahrenheit = 32.0 + (conditions.main.temp - 273.15) * 9.0 / 5.0;
        Ok(Weather {
            humidity: Some((conditions.main.humidity / 100.0).to_string()),
            temperature: Some(format_rounded(fahrenheit)),
            skyline: Some(condition.main.clone()),
            description: Some(title_case(&condition.description)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staleness_window_boundaries() {
        let now = 1_700_000_000;
        assert!(within_staleness_window(now, now));
        assert!(within_staleness_window(now - 1, now));
        assert!(within_staleness_window(now - 3 * 3600, now));
        assert!(!within_staleness_window(now - 3 * 3600 - 1, now));
        // Future timestamps still qualify
        assert!(within_staleness_window(now + 600, now));
    }

    #[test]
    fn test_normalize_temperature() {
        assert_eq!(normalize_temperature("20C"), "68");
        assert_eq!(normalize_temperature("20.5C"), "68.9");
        assert_eq!(normalize_temperature("-40c"), "-40");
        assert_eq!(normalize_temperature("74F"), "74");
        assert_eq!(normalize_temperature("74"), "74");
        // Unparseable values pass through untouched
        assert_eq!(normalize_temperature("warm"), "warm");
    }

    #[test]
    fn test_normalize_humidity() {
        assert_eq!(normalize_humidity("45%"), "0.45");
        assert_eq!(normalize_humidity("100%"), "1");
        assert_eq!(normalize_humidity("0.45"), "0.45");
        assert_eq!(normalize_humidity("humid"), "humid");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("scattered clouds"), "Scattered Clouds");
        assert_eq!(title_case("clear sky"), "Clear Sky");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_stale_entry_skips_lookup_entirely() {
        let mut server = mockito::Server::new();
        // The mock proves no request is made for a stale timestamp.
        let mock = server
            .mock("GET", "/data/2.5/weather")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .expect(0)
            .create();

        let client = WeatherClient::new(server.url(), "test-key", "en").unwrap();
        let now = 1_700_000_000;
        let result = client
            .resolve("30.0", "31.2", now - 4 * 3600, now)
            .unwrap();

        assert!(result.is_none());
        mock.assert();
    }

    #[test]
    fn test_current_conditions_mapping() {
        let mut server = mockito::Server::new();
        // 293.15 K = 20 C = 68 F
        let body = serde_json::json!({
            "weather": [{"id": 802, "main": "Clouds", "description": "scattered clouds"}],
            "main": {"temp": 293.15, "pressure": 1012, "humidity": 62}
        })
        .to_string();
        let mock = server
            .mock("GET", "/data/2.5/weather")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("lat".into(), "30.0131".into()),
                mockito::Matcher::UrlEncoded("lon".into(), "31.2089".into()),
                mockito::Matcher::UrlEncoded("appid".into(), "test-key".into()),
                mockito::Matcher::UrlEncoded("lang".into(), "en".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create();

        let client = WeatherClient::new(server.url(), "test-key", "en").unwrap();
        let now = 1_700_000_000;
        let weather = client
            .resolve("30.0131", "31.2089", now, now)
            .unwrap()
            .unwrap();

        mock.assert();
        assert_eq!(weather.humidity.as_deref(), Some("0.62"));
        assert_eq!(weather.temperature.as_deref(), Some("68"));
        assert_eq!(weather.skyline.as_deref(), Some("Clouds"));
        assert_eq!(weather.description.as_deref(), Some("Scattered Clouds"));
    }

    #[test]
    fn test_service_error_is_reported() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/data/2.5/weather")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create();

        let client = WeatherClient::new(server.url(), "test-key", "en").unwrap();
        let now = 1_700_000_000;
        let result = client.resolve("30.0", "31.2", now, now);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_condition_list_is_invalid() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/data/2.5/weather")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"weather": [], "main": {"temp": 293.15, "humidity": 62}}"#)
            .create();

        let client = WeatherClient::new(server.url(), "test-key", "en").unwrap();
        let now = 1_700_000_000;
        let result = client.resolve("30.0", "31.2", now, now);
        assert!(result.is_err());
    }
}

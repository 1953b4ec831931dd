//! Location resolution: literal coordinate pairs and forward geocoding.
//!
//! A location reaches this module in one of two shapes: a free-text address
//! that must be geocoded, or a literal `(lat, lon)` pair that bypasses the
//! service entirely and is carried into the entry verbatim. Geocoding uses
//! the OpenWeatherMap Geocoding API with the same key as the weather lookup.

use crate::constants;
use crate::errors::{AppResult, ResolveError};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// A resolved place as it will appear in the entry record.
///
/// Coordinate values are kept as strings so a literal pair given by the user
/// survives serialization byte-for-byte. Every field is optional; absent
/// fields render as the store format's `nan` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    /// Formatted address, when known.
    pub address: Option<String>,
    /// Latitude in degrees.
    pub latitude: Option<String>,
    /// Longitude in degrees.
    pub longitude: Option<String>,
    /// Altitude in meters. The upstream services don't provide one; it is
    /// only populated from the `--altitude` override.
    pub altitude: Option<String>,
}

/// How a location was specified before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationSpec {
    /// A free-text address to be geocoded.
    Address(String),
    /// A literal coordinate pair; geocoding is skipped.
    Coordinates {
        /// Latitude in degrees, verbatim as given
        latitude: String,
        /// Longitude in degrees, verbatim as given
        longitude: String,
    },
}

impl LocationSpec {
    /// Classifies a raw config value or directive argument.
    ///
    /// A value of the form `(lat, lon)` with two numeric components becomes
    /// [`LocationSpec::Coordinates`]; anything else is treated as an address.
    pub fn parse(value: &str) -> Self {
        match parse_coordinate_pair(value) {
            Some((latitude, longitude)) => LocationSpec::Coordinates {
                latitude,
                longitude,
            },
            None => LocationSpec::Address(value.to_string()),
        }
    }
}

/// Parses a literal `(lat, lon)` coordinate pair.
///
/// Both components must parse as finite floating point numbers; the original
/// textual form is returned so it can be stored verbatim.
///
/// # Examples
///
/// ```
/// use dayly::geocode::parse_coordinate_pair;
///
/// let (lat, lon) = parse_coordinate_pair("(-14.692110, -75.148877)").unwrap();
/// assert_eq!(lat, "-14.692110");
/// assert_eq!(lon, "-75.148877");
///
/// assert!(parse_coordinate_pair("Giza").is_none());
/// ```
pub fn parse_coordinate_pair(value: &str) -> Option<(String, String)> {
    let inner = value.trim().strip_prefix('(')?.strip_suffix(')')?;
    let (lat, lon) = inner.split_once(',')?;
    let lat = lat.trim();
    let lon = lon.trim();
    let lat_num: f64 = lat.parse().ok()?;
    let lon_num: f64 = lon.parse().ok()?;
    if !lat_num.is_finite() || !lon_num.is_finite() {
        return None;
    }
    Some((lat.to_string(), lon.to_string()))
}

/// One match returned by the geocoding endpoint.
#[derive(Debug, Deserialize)]
struct GeocodeMatch {
    name: String,
    #[serde(default)]
    local_names: Option<HashMap<String, String>>,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl GeocodeMatch {
    /// Builds the formatted address, preferring the localized place name.
    fn formatted_address(&self, language: &str) -> String {
        let name = self
            .local_names
            .as_ref()
            .and_then(|names| names.get(language))
            .unwrap_or(&self.name);

        let mut parts = vec![name.as_str()];
        if let Some(state) = self.state.as_deref() {
            if !state.is_empty() {
                parts.push(state);
            }
        }
        if let Some(country) = self.country.as_deref() {
            if !country.is_empty() {
                parts.push(country);
            }
        }
        parts.join(", ")
    }
}

/// Client for the OpenWeatherMap Geocoding API.
pub struct GeocodeClient {
    base_url: String,
    api_key: String,
    language: String,
    client: Client,
}

impl GeocodeClient {
    /// Creates a new geocoding client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the API (e.g. "http://api.openweathermap.org")
    /// * `api_key` - OpenWeatherMap API key
    /// * `language` - Two-letter language code for localized place names
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

    /// Resolves a location specification into a [`Location`].
    ///
    /// A literal coordinate pair short-circuits without touching the network.
    /// A free-text address is geocoded; zero results yield `Ok(None)`, which
    /// the caller treats the same as a transport failure (entry proceeds
    /// without a location).
    ///
    /// # Errors
    ///
    /// Returns a `ResolveError` (wrapped in `AppError`) if the request fails
    /// or the response cannot be interpreted.
    pub fn resolve(&self, spec: &LocationSpec) -> AppResult<Option<Location>> {
        match spec {
            LocationSpec::Coordinates {
                latitude,
                longitude,
            } => {
                debug!("Using literal coordinates ({}, {})", latitude, longitude);
                Ok(Some(Location {
                    address: None,
                    latitude: Some(latitude.clone()),
                    longitude: Some(longitude.clone()),
                    altitude: None,
                }))
            }
            LocationSpec::Address(address) => self.geocode(address),
        }
    }

    /// Geocodes a free-text address.
    fn geocode(&self, address: &str) -> AppResult<Option<Location>> {
        debug!("Geocoding address: {}", address);

        let url = format!("{}{}", self.base_url, constants::OWM_GEOCODE_PATH);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", address),
                ("limit", "1"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .map_err(ResolveError::Transport)?;

        if !response.status().is_success() {
            return Err(ResolveError::Status {
                service: "geocoding",
                status: response.status().as_u16(),
            }
            .into());
        }

        let matches: Vec<GeocodeMatch> = response.json().map_err(|e| {
            ResolveError::InvalidResponse {
                service: "geocoding",
                detail: format!("failed to parse response: {}", e),
            }
        })?;

        let Some(first) = matches.first() else {
            debug!("No geocoding result for {}", address);
            return Ok(None);
        };

        let location = Location {
            address: Some(first.formatted_address(&self.language)),
            latitude: Some(first.lat.to_string()),
            longitude: Some(first.lon.to_string()),
            altitude: None,
        };
        debug!(
            "Geocoded {} to ({}, {})",
            address, first.lat, first.lon
        );
        Ok(Some(location))
    }
}

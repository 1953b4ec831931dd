//! Constants used throughout the application.
//!
//! This module contains all constants used in the dayly application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "dayly";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "Post a diary entry into a Dayly sync folder";

// Store Format
/// Format version written into every entry record.
pub const DAYLY_FORMAT_VERSION: &str = "1.0.3.3";
/// Number of raw bytes in an entry identifier (rendered as twice as many hex digits).
pub const ENTRY_ID_BYTES: usize = 20;
/// Sentinel value for the unused `timestamp` field.
pub const ENTRY_TIMESTAMP_SENTINEL: i64 = -1;
/// Fixed value for the `flags` field.
pub const ENTRY_FLAGS: &str = "0";
/// Fixed value for the `status` field.
pub const ENTRY_STATUS: &str = "1";
/// Placeholder written for absent optional sub-fields.
pub const ABSENT_FIELD_PLACEHOLDER: &str = "nan";

// File System Parameters
/// File extension for entry files.
pub const ENTRY_FILE_EXTENSION: &str = ".entry";
/// Sub-directory of the sync folder holding entry files.
pub const ENTRIES_SUBDIR: &str = "entries";
/// Sub-directory of the sync folder holding photos.
pub const PHOTOS_SUBDIR: &str = "photos";
/// Default path of the settings file (tilde-expanded at load time).
pub const DEFAULT_CONFIG_PATH: &str = "~/.dayly";

// Configuration Keys
/// INI section holding the general settings.
pub const CONFIG_SECTION_DAYLY: &str = "dayly";
/// INI section holding the OpenWeatherMap settings.
pub const CONFIG_SECTION_OWM: &str = "OpenWeatherMap";
/// INI section mapping location names to addresses or coordinate pairs.
pub const CONFIG_SECTION_LOCATIONS: &str = "locations";
/// Key for the sync directory inside the `[dayly]` section.
pub const CONFIG_KEY_SYNCDIR: &str = "syncdir";
/// Key for the language inside the `[dayly]` section.
pub const CONFIG_KEY_LANGUAGE: &str = "language";
/// Key for the API key inside the `[OpenWeatherMap]` section.
pub const CONFIG_KEY_APIKEY: &str = "apikey";
/// Default two-letter language code when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

// Input Directives
/// Marker introducing a date/time directive on one of the first input lines.
pub const DATE_DIRECTIVE_PREFIX: &str = "!";
/// Marker introducing a location directive on one of the first input lines.
pub const LOCATION_DIRECTIVE_PREFIX: &str = "@";
/// Number of leading input lines inspected for directives.
pub const DIRECTIVE_SCAN_LINES: usize = 2;
/// Datetime format accepted in a date directive.
pub const DIRECTIVE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Date/Time Logic
/// Compact datetime format accepted by the `--date` option.
pub const DATE_SPEC_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%S";
/// Compact date-only format accepted by the `--date` option.
pub const DATE_SPEC_DATE_FORMAT: &str = "%Y%m%d";
/// Weather older than this window is not attached to an entry.
pub const STALENESS_WINDOW_SECS: i64 = 3 * 3600;

// Upstream APIs
/// Base URL of the OpenWeatherMap API (current conditions and geocoding).
pub const OWM_BASE_URL: &str = "http://api.openweathermap.org";
/// Environment variable overriding the API base URL.
pub const ENV_VAR_API_BASE_URL: &str = "DAYLY_API_BASE_URL";
/// Path of the current-conditions endpoint.
pub const OWM_WEATHER_PATH: &str = "/data/2.5/weather";
/// Path of the forward-geocoding endpoint.
pub const OWM_GEOCODE_PATH: &str = "/geo/1.0/direct";
/// Timeout applied to every outbound HTTP request.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

//! Command-line interface for the dayly application.
//!
//! Argument handling uses clap's derive API. The entry text itself is either
//! given inline with `--message` or read from standard input by `main`.

use crate::constants;
use chrono::{NaiveDate, NaiveDateTime};
use clap::Parser;

/// Post a diary entry into a Dayly sync folder
#[derive(Parser, Debug)]
#[clap(name = constants::APP_NAME, about = constants::APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Configured location name or literal "(lat, lon)" pair
    pub location: Option<String>,

    /// Timestamp of the entry (format: YYYYMMDD or YYYYMMDDTHHMMSS)
    #[clap(short = 'd', long)]
    pub date: Option<String>,

    /// Entry text; when omitted the text is read from standard input
    #[clap(short = 'm', long)]
    pub message: Option<String>,

    /// Two-letter language code for the address and weather description
    #[clap(short = 'l', long)]
    pub language: Option<String>,

    /// Path of the settings file
    #[clap(short = 'c', long, default_value = constants::DEFAULT_CONFIG_PATH)]
    pub conf: String,

    /// Dry run: print the entry instead of writing it
    #[clap(long)]
    pub debug: bool,

    /// Print verbose output
    #[clap(short = 'v', long)]
    pub verbose: bool,

    /// Set the address directly (geocoded unless coordinates are also given)
    #[clap(long, help_heading = "Manual overrides")]
    pub address: Option<String>,

    /// Set the latitude directly, in degrees
    #[clap(long, requires = "longitude", help_heading = "Manual overrides")]
    pub latitude: Option<String>,

    /// Set the longitude directly, in degrees
    #[clap(long, requires = "latitude", help_heading = "Manual overrides")]
    pub longitude: Option<String>,

    /// Set the altitude directly, in meters
    #[clap(long, help_heading = "Manual overrides")]
    pub altitude: Option<String>,

    /// Set the humidity directly (fraction, or percentage with a `%` suffix)
    #[clap(long, help_heading = "Manual overrides")]
    pub humidity: Option<String>,

    /// Set the temperature directly (Fahrenheit, or with a `C`/`F` suffix)
    #[clap(long, help_heading = "Manual overrides")]
    pub temperature: Option<String>,

    /// Set the sky condition label directly
    #[clap(long, help_heading = "Manual overrides")]
    pub skyline: Option<String>,

    /// Set the weather description directly
    #[clap(long, help_heading = "Manual overrides")]
    pub weather: Option<String>,

    /// Attach a photo (*.jpg or *.jpeg) copied into the sync folder
    #[clap(long, value_name = "PATH")]
    pub photo: Option<String>,
}

impl CliArgs {
    /// Returns true when any manual weather override was given.
    ///
    /// When this holds, the weather service is not contacted and the entry's
    /// weather section is built from the flags alone.
    pub fn has_manual_weather(&self) -> bool {
        self.humidity.is_some()
            || self.temperature.is_some()
            || self.skyline.is_some()
            || self.weather.is_some()
    }

    /// Returns true when any manual location override was given.
    pub fn has_manual_location(&self) -> bool {
        self.address.is_some() || (self.latitude.is_some() && self.longitude.is_some())
    }
}

/// Parses a `--date` specifier in `YYYYMMDD` or `YYYYMMDDTHHMMSS` form.
///
/// A date without a time component means midnight. Returns `None` when the
/// specifier doesn't match either format; unlike in-text directives, the
/// caller treats that as a fatal input error since the user asked for it
/// explicitly.
///
/// # Examples
///
/// ```
/// use dayly::cli::parse_date_spec;
///
/// let dt = parse_date_spec("20240115T133000").unwrap();
/// assert_eq!(dt.to_string(), "2024-01-15 13:30:00");
///
/// let dt = parse_date_spec("20240115").unwrap();
/// assert_eq!(dt.to_string(), "2024-01-15 00:00:00");
///
/// assert!(parse_date_spec("yesterday").is_none());
/// ```
pub fn parse_date_spec(spec: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(spec, constants::DATE_SPEC_DATETIME_FORMAT) {
        return Some(dt);
    }
    NaiveDate::parse_from_str(spec, constants::DATE_SPEC_DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

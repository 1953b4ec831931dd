//! Configuration management for the dayly application.
//!
//! Settings live in an INI file, `~/.dayly` by default:
//!
//! ```ini
//! [dayly]
//! syncdir = ~/Dropbox/Apps/Dayly
//! language = en
//!
//! [OpenWeatherMap]
//! apikey = 0123456789abcdef
//!
//! [locations]
//! home = 1 Pyramid Road, Giza
//! camp = (-14.692110, -75.148877)
//! ```
//!
//! The file is parsed into a typed [`Config`] and validated at load time:
//! a missing file, a missing `syncdir`, or a missing `apikey` fails fast with
//! a configuration error instead of surfacing later mid-pipeline.

use crate::constants;
use crate::errors::{AppError, AppResult};
use crate::geocode::LocationSpec;
use ini::Ini;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Configuration for the dayly application.
pub struct Config {
    /// Sync folder mirrored by the external synchronization agent.
    pub sync_dir: PathBuf,
    /// Two-letter language code for addresses and weather descriptions.
    pub language: String,
    /// OpenWeatherMap API key, shared by the geocoding and weather lookups.
    pub owm_api_key: String,
    /// Named locations from the `[locations]` section, pre-classified into
    /// addresses and literal coordinate pairs.
    pub locations: HashMap<String, LocationSpec>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("sync_dir", &self.sync_dir)
            .field("language", &self.language)
            .field("owm_api_key", &"[REDACTED]")
            .field("locations", &self.locations.keys())
            .finish()
    }
}

impl Config {
    /// Expands the settings file path given on the command line.
    ///
    /// Handles `~` and environment variable references, so the default
    /// `~/.dayly` resolves against the user's home directory.
    pub fn expand_path(raw: &str) -> AppResult<PathBuf> {
        let expanded = shellexpand::full(raw)
            .map_err(|e| AppError::Config(format!("Failed to expand path {}: {}", raw, e)))?;
        Ok(PathBuf::from(expanded.into_owned()))
    }

    /// Loads and validates the settings file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or parsed, if
    /// `[dayly] syncdir` or `[OpenWeatherMap] apikey` is missing, or if the
    /// expanded sync directory is not an absolute path.
    pub fn load(path: &Path) -> AppResult<Self> {
        let ini = Ini::load_from_file(path).map_err(|e| {
            AppError::Config(format!(
                "Cannot read settings file {}: {}",
                path.display(),
                e
            ))
        })?;

        let dayly = ini
            .section(Some(constants::CONFIG_SECTION_DAYLY))
            .ok_or_else(|| {
                AppError::Config(format!(
                    "Missing [{}] section in {}",
                    constants::CONFIG_SECTION_DAYLY,
                    path.display()
                ))
            })?;

        let sync_dir_raw = dayly.get(constants::CONFIG_KEY_SYNCDIR).ok_or_else(|| {
            AppError::Config(format!(
                "Missing {} in [{}] section",
                constants::CONFIG_KEY_SYNCDIR,
                constants::CONFIG_SECTION_DAYLY
            ))
        })?;
        let sync_dir = Self::expand_path(sync_dir_raw)?;

        let language = dayly
            .get(constants::CONFIG_KEY_LANGUAGE)
            .unwrap_or(constants::DEFAULT_LANGUAGE)
            .to_string();

        let owm_api_key = ini
            .section(Some(constants::CONFIG_SECTION_OWM))
            .and_then(|section| section.get(constants::CONFIG_KEY_APIKEY))
            .ok_or_else(|| {
                AppError::Config(format!(
                    "Missing {} in [{}] section",
                    constants::CONFIG_KEY_APIKEY,
                    constants::CONFIG_SECTION_OWM
                ))
            })?
            .to_string();

        let locations = ini
            .section(Some(constants::CONFIG_SECTION_LOCATIONS))
            .map(|section| {
                section
                    .iter()
                    .map(|(name, value)| (name.to_string(), LocationSpec::parse(value)))
                    .collect()
            })
            .unwrap_or_default();

        let config = Config {
            sync_dir,
            language,
            owm_api_key,
            locations,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the sync directory is empty or relative,
    /// or the API key is empty.
    pub fn validate(&self) -> AppResult<()> {
        if self.sync_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Sync directory path is empty".to_string()));
        }
        if !self.sync_dir.is_absolute() {
            return Err(AppError::Config(
                "Sync directory must be an absolute path".to_string(),
            ));
        }
        if self.owm_api_key.is_empty() {
            return Err(AppError::Config(
                "OpenWeatherMap API key is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Looks up a configured location by name.
    pub fn location(&self, name: &str) -> Option<&LocationSpec> {
        self.locations.get(name)
    }
}

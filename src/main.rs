/*!
# Dayly - Post a Diary Entry

Command-line tool that appends one entry to a Dayly diary's sync folder,
optionally enriched with a resolved location and current weather.

## Usage

```
dayly [OPTIONS] [LOCATION]

echo "Dear diary." | dayly home
dayly -m "Hi!" --date 20240115T133000 "(30.0131, 31.2089)"
```

The entry text is read from standard input unless `--message` is given. The
first two lines of the text may carry directives: `!YYYY-MM-DD HH:MM:SS`
sets the entry timestamp, `@name` or `@(lat, lon)` sets the location.

## Configuration

Settings live in `~/.dayly` (override with `--conf`): the sync folder and
language in `[dayly]`, the API key in `[OpenWeatherMap]`, and named places
in `[locations]`.
*/

use chrono::Local;
use clap::Parser;
use dayly::cli::{self, CliArgs};
use dayly::config::Config;
use dayly::constants;
use dayly::entry::{self, Entry, MediaItem};
use dayly::entry_io;
use dayly::errors::{AppError, AppResult};
use dayly::geocode::{parse_coordinate_pair, GeocodeClient, Location, LocationSpec};
use dayly::input::{self, ParsedInput};
use dayly::weather::{self, Weather, WeatherClient};
use std::io::Read;
use std::process;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// The main entry point for the dayly application.
///
/// Initializes logging, runs the pipeline, and maps any fatal error to a
/// non-zero exit code with a readable message on stderr.
fn main() {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    if let Err(error) = run(&args) {
        eprintln!("{}", error);
        process::exit(1);
    }
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so stdout stays reserved for the dry-run output and the
/// written entry path. `--verbose` forces debug level; otherwise `RUST_LOG`
/// applies with a warn-level default.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(format!("{}=debug", constants::APP_NAME))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the entry-composition pipeline.
///
/// The flow is strictly linear: load config, read and parse the input,
/// resolve the location, resolve the weather, compose the entry, then write
/// it (or print it in dry-run mode). Lookup failures degrade the entry with
/// a warning; everything else is fatal.
fn run(args: &CliArgs) -> AppResult<()> {
    let config_path = Config::expand_path(&args.conf)?;
    let config = Config::load(&config_path)?;
    debug!("Loaded configuration: {:?}", config);

    let language = args
        .language
        .clone()
        .unwrap_or_else(|| config.language.clone());

    let raw = read_entry_text(args)?;
    let parsed = input::parse(&raw);

    let now = Local::now();
    let generated = now.timestamp();
    let datetime = effective_datetime(args, &parsed, generated)?;

    let base_url = api_base_url();
    let location = resolve_location(args, &parsed, &config, &language, &base_url);
    let weather = resolve_weather(
        args,
        location.as_ref(),
        &config,
        &language,
        &base_url,
        datetime,
        generated,
    );

    let mut entry = Entry::new(parsed.body, datetime, generated);
    entry.location = location;
    entry.weather = weather;

    if let Some(photo) = &args.photo {
        let source = Config::expand_path(photo)?;
        let name = entry_io::import_photo(&config.sync_dir, &entry.id, &source, args.debug)?;
        entry.media.push(MediaItem::photo(name));
    }

    if args.debug {
        println!("{}", entry.filename());
        for line in entry.render().lines() {
            println!("| {}", line);
        }
        return Ok(());
    }

    let path = entry_io::write_entry(&config.sync_dir, &entry)?;
    info!("Entry posted");
    println!("{}", path.display());
    Ok(())
}

/// Returns the API base URL, honoring the environment override.
fn api_base_url() -> String {
    std::env::var(constants::ENV_VAR_API_BASE_URL)
        .unwrap_or_else(|_| constants::OWM_BASE_URL.to_string())
}

/// Reads the raw entry text from `--message` or standard input.
fn read_entry_text(args: &CliArgs) -> AppResult<String> {
    if let Some(message) = &args.message {
        return Ok(message.clone());
    }
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .map_err(|e| AppError::Input(format!("Cannot read entry text from stdin: {}", e)))?;
    Ok(raw)
}

/// Determines the entry's effective timestamp in epoch seconds.
///
/// Precedence: `--date` option, then an in-text `!` directive, then the
/// current time. A malformed `--date` is fatal since the user asked for it
/// explicitly; a malformed directive already stayed in the body.
fn effective_datetime(args: &CliArgs, parsed: &ParsedInput, now_epoch: i64) -> AppResult<i64> {
    if let Some(spec) = &args.date {
        let dt = cli::parse_date_spec(spec).ok_or_else(|| {
            AppError::Input(format!(
                "Invalid --date '{}': expected YYYYMMDD or YYYYMMDDTHHMMSS",
                spec
            ))
        })?;
        return Ok(entry::epoch_seconds(dt));
    }
    if let Some(dt) = parsed.datetime {
        return Ok(entry::epoch_seconds(dt));
    }
    Ok(now_epoch)
}

/// Resolves the entry's location, degrading to `None` on any failure.
///
/// Precedence: explicit coordinate flags, then `--address`, then the
/// positional location name, then the in-text `@` directive. A name is
/// looked up in `[locations]`; a literal `(lat, lon)` pair anywhere skips
/// geocoding. An unknown name is not an error.
fn resolve_location(
    args: &CliArgs,
    parsed: &ParsedInput,
    config: &Config,
    language: &str,
    base_url: &str,
) -> Option<Location> {
    if let (Some(latitude), Some(longitude)) = (&args.latitude, &args.longitude) {
        debug!("Using coordinates from the command line");
        return Some(Location {
            address: args.address.clone(),
            latitude: Some(latitude.clone()),
            longitude: Some(longitude.clone()),
            altitude: args.altitude.clone(),
        });
    }

    let spec = if let Some(address) = &args.address {
        Some(LocationSpec::Address(address.clone()))
    } else {
        let key = args.location.as_deref().or(parsed.location.as_deref())?;
        if let Some((latitude, longitude)) = parse_coordinate_pair(key) {
            Some(LocationSpec::Coordinates {
                latitude,
                longitude,
            })
        } else if let Some(known) = config.location(key) {
            Some(known.clone())
        } else {
            warn!("Unknown location '{}'; posting without a location", key);
            None
        }
    }?;

    let client = match GeocodeClient::new(base_url, &config.owm_api_key, language) {
        Ok(client) => client,
        Err(error) => {
            warn!("Cannot build geocoding client: {}", error);
            return None;
        }
    };

    let mut location = match client.resolve(&spec) {
        Ok(Some(location)) => location,
        Ok(None) => {
            warn!("No geocoding result; posting without a location");
            return None;
        }
        Err(error) => {
            warn!("Location lookup failed: {}; posting without a location", error);
            return None;
        }
    };

    if location.altitude.is_none() {
        location.altitude = args.altitude.clone();
    }
    Some(location)
}

/// Resolves the entry's weather, degrading to `None` on any failure.
///
/// Manual weather flags win outright and skip the service. Otherwise the
/// lookup needs resolved coordinates and an effective timestamp inside the
/// staleness window.
fn resolve_weather(
    args: &CliArgs,
    location: Option<&Location>,
    config: &Config,
    language: &str,
    base_url: &str,
    datetime: i64,
    now_epoch: i64,
) -> Option<Weather> {
    if args.has_manual_weather() {
        debug!("Using weather from the command line");
        return Some(Weather {
            humidity: args.humidity.as_deref().map(weather::normalize_humidity),
            temperature: args
                .temperature
                .as_deref()
                .map(weather::normalize_temperature),
            skyline: args.skyline.clone(),
            description: args.weather.clone(),
        });
    }

    let (latitude, longitude) = location.and_then(|location| {
        location
            .latitude
            .as_deref()
            .zip(location.longitude.as_deref())
    })?;

    let client = match WeatherClient::new(base_url, &config.owm_api_key, language) {
        Ok(client) => client,
        Err(error) => {
            warn!("Cannot build weather client: {}", error);
            return None;
        }
    };

    match client.resolve(latitude, longitude, datetime, now_epoch) {
        Ok(weather) => weather,
        Err(error) => {
            warn!("Weather lookup failed: {}; posting without weather", error);
            None
        }
    }
}

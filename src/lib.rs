/*!
# Dayly

Dayly is a small command-line tool that posts a new entry into a Dayly
diary's sync folder. The folder is mirrored to the diary app's devices by an
external file-sync agent; this tool only composes and drops the entry file.

Given free-text content (piped or inline), it optionally enriches the entry
with a resolved location (a configured place name, a free-text address, or a
literal coordinate pair) and with current weather conditions, then serializes
everything into the diary's entry file format.

## Architecture

The codebase follows a modular architecture with clear separation of concerns:

- `cli`: Command-line interface handling using clap
- `config`: Settings file (`~/.dayly`) loading and validation
- `errors`: Error handling infrastructure
- `input`: Directive parsing for the raw entry text
- `geocode`: Location resolution via the geocoding API
- `weather`: Current conditions via the weather API, with the staleness gate
- `entry`: Entry composition and serialization
- `entry_io`: Writing into the sync directory

Execution is one linear pipeline per invocation; there is no persistent
state, no concurrency, and no retry logic. Lookup failures degrade the entry
(the section is omitted); configuration and write failures are fatal.
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Constants used throughout the application
pub mod constants;
/// Entry composition and serialization
pub mod entry;
/// Sync-directory I/O for entries and photos
pub mod entry_io;
/// Error types and utilities for error handling
pub mod errors;
/// Location resolution and coordinate pair handling
pub mod geocode;
/// Directive parsing for raw entry text
pub mod input;
/// Weather resolution with the staleness window
pub mod weather;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use entry::Entry;
pub use errors::{AppError, AppResult};

//! Error handling utilities for the dayly application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Lookup failures (`ResolveError`) are deliberately kept separate from the
//! fatal error categories: a failed geocoding or weather call degrades the
//! entry (the section is omitted) instead of aborting the invocation, so those
//! errors are handled at the call site and never reach `main`'s error path.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents failures while querying the geocoding or weather services.
///
/// These errors are non-fatal by policy: callers log them at warn level and
/// proceed without the corresponding entry section.
///
/// # Examples
///
/// ```
/// use dayly::errors::ResolveError;
///
/// let error = ResolveError::InvalidResponse {
///     service: "geocoding",
///     detail: "missing field `lat`".to_string(),
/// };
/// assert!(format!("{}", error).contains("geocoding"));
/// ```
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The HTTP request could not be completed (connection refused, timeout, DNS).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered but the payload was not what we expected.
    #[error("Unexpected response from {service} service: {detail}")]
    InvalidResponse {
        /// Which upstream service produced the response
        service: &'static str,
        /// A description of what was wrong with it
        detail: String,
    },

    /// The service answered with a non-success HTTP status.
    #[error("{service} service returned HTTP {status}")]
    Status {
        /// Which upstream service produced the response
        service: &'static str,
        /// The HTTP status code
        status: u16,
    },
}

/// Represents failures while writing into the sync directory.
///
/// Any of these is fatal for the invocation: the entry could not be handed
/// over to the sync agent.
///
/// # Examples
///
/// ```
/// use dayly::errors::WriteError;
/// use std::path::PathBuf;
///
/// let error = WriteError::AlreadyExists {
///     path: PathBuf::from("/sync/entries/AB.entry"),
/// };
/// assert!(format!("{}", error).contains("already exists"));
/// ```
#[derive(Debug, Error)]
pub enum WriteError {
    /// The entries (or photos) directory could not be created or accessed.
    #[error("Sync directory is not accessible: {path}: {source}")]
    DirectoryInaccessible {
        /// The directory that could not be used
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A file with the entry's name already exists in the sync directory.
    #[error("Entry file already exists: {path}")]
    AlreadyExists {
        /// The path that was about to be written
        path: PathBuf,
    },

    /// Writing the file failed after it was created.
    #[error("Failed to write entry file {path}: {source}")]
    Io {
        /// The path that was being written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents all possible errors that can occur in the dayly application.
///
/// This enum is the central error type used across the application, with
/// variants for different error categories. It uses `thiserror` for deriving
/// the `Error` trait implementation and formatted error messages.
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors in the invocation itself: malformed `--date`, unreadable
    /// standard input, unsupported photo type.
    #[error("Input error: {0}")]
    Input(String),

    /// Input/output errors from filesystem operations.
    ///
    /// This variant automatically converts from `std::io::Error` through the `From` trait.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors from the geocoding or weather lookups.
    ///
    /// Present so lookup helpers can use `?` internally; callers convert this
    /// into a degraded (sectionless) entry rather than propagating it.
    #[error("Lookup error: {0}")]
    Resolve(#[from] ResolveError),

    /// Errors while writing into the sync directory.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::NotFound),
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_app_error_display() {
        let config_error = AppError::Config("missing apikey".to_string());
        assert_eq!(
            format!("{}", config_error),
            "Configuration error: missing apikey"
        );

        let input_error = AppError::Input("invalid date spec: 2024x".to_string());
        assert_eq!(
            format!("{}", input_error),
            "Input error: invalid date spec: 2024x"
        );

        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        assert_eq!(
            format!("{}", AppError::Io(io_error)),
            "I/O error: permission denied"
        );
    }

    #[test]
    fn test_write_error_variants() {
        let error = WriteError::AlreadyExists {
            path: PathBuf::from("/sync/entries/00AB.entry"),
        };
        assert!(format!("{}", error).contains("already exists"));
        assert!(format!("{}", error).contains("/sync/entries/00AB.entry"));

        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let error = WriteError::DirectoryInaccessible {
            path: PathBuf::from("/sync/entries"),
            source: io_error,
        };
        assert!(format!("{}", error).contains("not accessible"));
        assert!(format!("{}", error).contains("permission denied"));
    }

    #[test]
    fn test_resolve_error_display() {
        let error = ResolveError::InvalidResponse {
            service: "weather",
            detail: "missing field `main`".to_string(),
        };
        let message = format!("{}", error);
        assert!(message.contains("weather"));
        assert!(message.contains("missing field `main`"));

        let error = ResolveError::Status {
            service: "geocoding",
            status: 401,
        };
        assert!(format!("{}", error).contains("401"));
    }

    #[test]
    fn test_write_error_conversion_to_app_error() {
        let write_error = WriteError::AlreadyExists {
            path: PathBuf::from("/sync/entries/00AB.entry"),
        };
        let app_error: AppError = write_error.into();

        match app_error {
            AppError::Write(WriteError::AlreadyExists { path }) => {
                assert_eq!(path, PathBuf::from("/sync/entries/00AB.entry"));
            }
            _ => panic!("Expected AppError::Write variant"),
        }
    }

    #[test]
    fn test_write_error_source_chaining() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let write_error = WriteError::DirectoryInaccessible {
            path: PathBuf::from("/sync/entries"),
            source: io_error,
        };
        let app_error = AppError::Write(write_error);

        // AppError -> WriteError -> io::Error
        let first = app_error.source().expect("AppError::Write has a source");
        let write_source = first
            .downcast_ref::<WriteError>()
            .expect("First source should be WriteError");
        let second = write_source.source().expect("WriteError has a source");
        let io_source = second
            .downcast_ref::<io::Error>()
            .expect("Second source should be io::Error");
        assert_eq!(io_source.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_fatal_variants_have_no_source() {
        assert!(AppError::Config("x".to_string()).source().is_none());
        assert!(AppError::Input("x".to_string()).source().is_none());
    }
}

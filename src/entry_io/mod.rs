//! Sync-directory I/O: writing entry files and importing photos.
//!
//! The sync directory is owned by an external synchronization agent; this
//! module only ever adds files to it. Each invocation writes exactly one
//! uniquely named entry file with a create-new operation, so no locking is
//! needed. Failures here are fatal for the invocation, unlike the lookup
//! failures which merely degrade the entry.

use crate::constants;
use crate::entry::{hex_upper, Entry};
use crate::errors::{AppError, AppResult, WriteError};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Ensures a sub-directory of the sync folder exists, creating it if needed.
fn ensure_subdir(sync_dir: &Path, name: &str) -> Result<PathBuf, WriteError> {
    let dir = sync_dir.join(name);
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|e| WriteError::DirectoryInaccessible {
            path: dir.clone(),
            source: e,
        })?;
        debug!("Created sync sub-directory {}", dir.display());
    }
    Ok(dir)
}

/// Writes an entry into `<sync_dir>/entries/<id>.entry`.
///
/// The file is created with a create-new operation: an already existing file
/// (same content and timestamp posted twice) is reported rather than
/// overwritten, since the sync agent may already have propagated it.
///
/// # Returns
///
/// The path of the file that was written.
///
/// # Errors
///
/// Returns `AppError::Write` if the entries directory cannot be created or
/// the file cannot be created or written.
pub fn write_entry(sync_dir: &Path, entry: &Entry) -> AppResult<PathBuf> {
    let entries_dir = ensure_subdir(sync_dir, constants::ENTRIES_SUBDIR)?;
    let path = entries_dir.join(entry.filename());

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                AppError::Write(WriteError::AlreadyExists { path: path.clone() })
            } else {
                AppError::Write(WriteError::DirectoryInaccessible {
                    path: entries_dir.clone(),
                    source: e,
                })
            }
        })?;

    file.write_all(entry.render().as_bytes())
        .map_err(|e| WriteError::Io {
            path: path.clone(),
            source: e,
        })?;

    info!("Wrote entry {}", path.display());
    Ok(path)
}

/// Copies a photo into `<sync_dir>/photos/` under a collision-free name.
///
/// Only `.jpg`/`.jpeg` sources are accepted (the store format expects JPEG).
/// The target name is `<mediaid>_<entryid>.jpg` where the media id is hashed
/// from the entry id and source path; on the off chance the name is taken, a
/// retry counter is mixed into the hash. In dry-run mode the copy is skipped
/// but the name is still computed and returned.
///
/// # Returns
///
/// The file name (not path) recorded in the entry's media item.
///
/// # Errors
///
/// Returns `AppError::Input` for a non-JPEG source and `AppError::Write` if
/// the photos directory or the copy fails.
pub fn import_photo(
    sync_dir: &Path,
    entry_id: &str,
    source: &Path,
    dry_run: bool,
) -> AppResult<String> {
    match source
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => {}
        _ => {
            return Err(AppError::Input(format!(
                "photo must be *.jpg or *.jpeg: {}",
                source.display()
            )))
        }
    }

    let photos_dir = ensure_subdir(sync_dir, constants::PHOTOS_SUBDIR)?;

    let mut attempt: u32 = 0;
    let (name, target) = loop {
        let name = format!("{}_{}.jpg", media_id(entry_id, source, attempt), entry_id);
        let target = photos_dir.join(&name);
        if !target.exists() {
            break (name, target);
        }
        attempt += 1;
    };

    if dry_run {
        debug!(
            "Dry run: would copy {} to {}",
            source.display(),
            target.display()
        );
        return Ok(name);
    }

    fs::copy(source, &target).map_err(|e| WriteError::Io {
        path: target.clone(),
        source: e,
    })?;
    info!("Imported photo {}", target.display());
    Ok(name)
}

/// Derives a media identifier from the entry id, source path, and attempt.
fn media_id(entry_id: &str, source: &Path, attempt: u32) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(entry_id.as_bytes());
    hasher.update(source.to_string_lossy().as_bytes());
    hasher.update(&attempt.to_be_bytes());
    let digest = hasher.finalize();
    hex_upper(&digest.as_bytes()[..constants::ENTRY_ID_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use tempfile::tempdir;

    #[test]
    fn test_write_entry_creates_file_in_entries_dir() {
        let sync_dir = tempdir().unwrap();
        let entry = Entry::new("Hi!", 1_700_000_000, 1_700_000_000);

        let path = write_entry(sync_dir.path(), &entry).unwrap();

        assert_eq!(
            path,
            sync_dir
                .path()
                .join("entries")
                .join(format!("{}.entry", entry.id))
        );
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, entry.render());
    }

    #[test]
    fn test_write_entry_refuses_to_overwrite() {
        let sync_dir = tempdir().unwrap();
        let entry = Entry::new("Hi!", 1_700_000_000, 1_700_000_000);

        write_entry(sync_dir.path(), &entry).unwrap();
        let second = write_entry(sync_dir.path(), &entry);

        match second {
            Err(AppError::Write(WriteError::AlreadyExists { .. })) => {}
            other => panic!("Expected AlreadyExists, got {:?}", other),
        }
    }

    #[test]
    fn test_write_entry_inaccessible_directory() {
        // A regular file where the sync directory should be
        let holder = tempdir().unwrap();
        let bogus = holder.path().join("not-a-dir");
        fs::write(&bogus, b"occupied").unwrap();

        let entry = Entry::new("Hi!", 1_700_000_000, 1_700_000_000);
        let result = write_entry(&bogus, &entry);
        assert!(matches!(
            result,
            Err(AppError::Write(WriteError::DirectoryInaccessible { .. }))
        ));
    }

    #[test]
    fn test_import_photo_copies_into_photos_dir() {
        let sync_dir = tempdir().unwrap();
        let source_dir = tempdir().unwrap();
        let source = source_dir.path().join("holiday.jpg");
        fs::write(&source, b"not really a jpeg").unwrap();

        let name = import_photo(sync_dir.path(), "AB12", &source, false).unwrap();

        assert!(name.ends_with("_AB12.jpg"));
        let target = sync_dir.path().join("photos").join(&name);
        assert_eq!(fs::read(&target).unwrap(), b"not really a jpeg");
    }

    #[test]
    fn test_import_photo_dry_run_skips_copy() {
        let sync_dir = tempdir().unwrap();
        let source_dir = tempdir().unwrap();
        let source = source_dir.path().join("holiday.jpeg");
        fs::write(&source, b"x").unwrap();

        let name = import_photo(sync_dir.path(), "AB12", &source, true).unwrap();

        assert!(!sync_dir.path().join("photos").join(&name).exists());
    }

    #[test]
    fn test_import_photo_rejects_non_jpeg() {
        let sync_dir = tempdir().unwrap();
        let source_dir = tempdir().unwrap();
        let source = source_dir.path().join("holiday.png");
        fs::write(&source, b"x").unwrap();

        let result = import_photo(sync_dir.path(), "AB12", &source, false);
        assert!(matches!(result, Err(AppError::Input(_))));
    }

    #[test]
    fn test_import_photo_avoids_name_collision() {
        let sync_dir = tempdir().unwrap();
        let source_dir = tempdir().unwrap();
        let source = source_dir.path().join("holiday.jpg");
        fs::write(&source, b"x").unwrap();

        let first = import_photo(sync_dir.path(), "AB12", &source, false).unwrap();
        let second = import_photo(sync_dir.path(), "AB12", &source, false).unwrap();
        assert_ne!(first, second);
    }
}

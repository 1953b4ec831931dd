//! Entry composition and serialization.
//!
//! An [`Entry`] is assembled once per invocation from the parsed body, the
//! effective timestamp, and whatever enrichments resolved, then rendered into
//! the Dayly store format: a fixed-order XML-like hierarchy with one space of
//! indentation per level and no trailing newline. The identifier is derived
//! from the content and effective timestamp, so identical inputs produce the
//! identical record.

use crate::constants;
use crate::geocode::Location;
use crate::weather::Weather;
use chrono::{Local, LocalResult, NaiveDateTime, TimeZone};

/// A media attachment referenced from an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Attachment type; currently always "photo".
    pub kind: String,
    /// File name inside the sync folder's photos directory.
    pub file: String,
    /// Free-text description.
    pub description: String,
}

impl MediaItem {
    /// Creates a photo attachment.
    pub fn photo(file: impl Into<String>) -> Self {
        Self {
            kind: "photo".to_string(),
            file: file.into(),
            description: String::new(),
        }
    }
}

/// One diary entry, fully assembled and ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Content-derived identifier: 40 uppercase hex digits.
    pub id: String,
    /// Invocation wall-clock time, epoch seconds.
    pub generated: i64,
    /// Effective content timestamp, epoch seconds.
    pub datetime: i64,
    /// Entry body text.
    pub content: String,
    /// Resolved location, if any.
    pub location: Option<Location>,
    /// Resolved weather, if any.
    pub weather: Option<Weather>,
    /// Photo attachments, if any.
    pub media: Vec<MediaItem>,
}

impl Entry {
    /// Composes an entry, deriving its identifier from content and timestamp.
    pub fn new(content: impl Into<String>, datetime: i64, generated: i64) -> Self {
        let content = content.into();
        let id = entry_id(&content, datetime);
        Self {
            id,
            generated,
            datetime,
            content,
            location: None,
            weather: None,
            media: Vec::new(),
        }
    }

    /// File name of this entry inside the entries directory.
    pub fn filename(&self) -> String {
        format!("{}{}", self.id, constants::ENTRY_FILE_EXTENSION)
    }

    /// Renders the entry into the Dayly store format.
    ///
    /// Field order is fixed; optional sections are emitted only when present
    /// and absent sub-fields render as `nan`. The output carries no trailing
    /// newline.
    pub fn render(&self) -> String {
        let mut out = Vec::new();
        out.push("<entry>".to_string());
        out.push(tag(1, "version", constants::DAYLY_FORMAT_VERSION));
        out.push(tag(1, "generated", &self.generated.to_string()));
        out.push(tag(1, "id", &self.id));
        out.push(tag(1, "content", &escape(&self.content)));
        out.push(tag(1, "datetime", &self.datetime.to_string()));
        out.push(tag(
            1,
            "timestamp",
            &constants::ENTRY_TIMESTAMP_SENTINEL.to_string(),
        ));
        out.push(tag(1, "flags", constants::ENTRY_FLAGS));
        out.push(tag(1, "status", constants::ENTRY_STATUS));

        if let Some(location) = &self.location {
            out.push(" <location>".to_string());
            out.push(opt_tag(2, "address", location.address.as_deref()));
            out.push(opt_tag(2, "latitude", location.latitude.as_deref()));
            out.push(opt_tag(2, "longitude", location.longitude.as_deref()));
            out.push(opt_tag(2, "altitude", location.altitude.as_deref()));
            out.push(" </location>".to_string());
        }

        if !self.media.is_empty() {
            out.push(" <media>".to_string());
            for item in &self.media {
                out.push("  <item>".to_string());
                out.push(tag(3, "type", &item.kind));
                out.push(tag(3, "file", &item.file));
                out.push(tag(3, "description", &escape(&item.description)));
                out.push("  </item>".to_string());
            }
            out.push(" </media>".to_string());
        }

        if let Some(weather) = &self.weather {
            out.push(" <weather>".to_string());
            out.push(opt_tag(2, "humidity", weather.humidity.as_deref()));
            out.push(opt_tag(2, "temperature", weather.temperature.as_deref()));
            out.push(opt_tag(2, "skyline", weather.skyline.as_deref()));
            out.push(opt_tag(2, "weather", weather.description.as_deref()));
            out.push(" </weather>".to_string());
        }

        out.push("</entry>".to_string());
        out.join("\n")
    }
}

/// Derives the deterministic entry identifier.
///
/// The content bytes and the big-endian effective timestamp are hashed with
/// BLAKE3; the first [`constants::ENTRY_ID_BYTES`] bytes of the digest become
/// the identifier, rendered as uppercase hex.
///
/// # Examples
///
/// ```
/// use dayly::entry::entry_id;
///
/// let a = entry_id("Hi!", 1_700_000_000);
/// let b = entry_id("Hi!", 1_700_000_000);
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 40);
/// assert_ne!(a, entry_id("Hi!", 1_700_000_001));
/// ```
pub fn entry_id(content: &str, datetime: i64) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(content.as_bytes());
    hasher.update(&datetime.to_be_bytes());
    let digest = hasher.finalize();
    hex_upper(&digest.as_bytes()[..constants::ENTRY_ID_BYTES])
}

/// Renders bytes as uppercase hex.
pub(crate) fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Converts a naive (wall-clock) datetime to epoch seconds in local time.
///
/// Per the non-goal on time-zone-aware date handling this is deliberately
/// simple: an ambiguous local time takes the earlier instant, a nonexistent
/// one falls back to a UTC reading.
pub fn epoch_seconds(datetime: NaiveDateTime) -> i64 {
    match Local.from_local_datetime(&datetime) {
        LocalResult::Single(dt) => dt.timestamp(),
        LocalResult::Ambiguous(earlier, _) => earlier.timestamp(),
        LocalResult::None => datetime.and_utc().timestamp(),
    }
}

fn tag(indent: usize, name: &str, value: &str) -> String {
    format!("{}<{}>{}</{}>", " ".repeat(indent), name, value, name)
}

fn opt_tag(indent: usize, name: &str, value: Option<&str>) -> String {
    let value = match value {
        Some(v) => escape(v),
        None => constants::ABSENT_FIELD_PLACEHOLDER.to_string(),
    };
    tag(indent, name, &value)
}

/// Escapes the three characters the store format reserves.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

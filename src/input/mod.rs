//! Directive parsing for raw entry text.
//!
//! The first two lines of the input may carry directives: `!` followed by a
//! `YYYY-MM-DD HH:MM:SS` timestamp, and `@` followed by a configured location
//! name or a literal `(lat, lon)` pair. Matched lines are stripped from the
//! body; anything that doesn't parse stays in the body untouched, so a
//! malformed directive can never make an invocation fail.

use crate::constants;
use chrono::NaiveDateTime;

/// The outcome of scanning raw input text for directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    /// Timestamp from a `!` directive, if one was found.
    pub datetime: Option<NaiveDateTime>,
    /// Location key from an `@` directive, if one was found.
    pub location: Option<String>,
    /// Entry body with directive lines removed and outer whitespace trimmed.
    pub body: String,
}

/// Scans raw text for directives and splits off the body.
///
/// Only the first [`constants::DIRECTIVE_SCAN_LINES`] lines are inspected, so
/// an `@` or `!` deeper in the text is always body content. Each directive
/// kind is recognized at most once.
///
/// # Examples
///
/// ```
/// use dayly::input::parse;
///
/// let parsed = parse("!2024-01-15 13:30:00\n@home\nDear diary.");
/// assert!(parsed.datetime.is_some());
/// assert_eq!(parsed.location.as_deref(), Some("home"));
/// assert_eq!(parsed.body, "Dear diary.");
/// ```
pub fn parse(raw: &str) -> ParsedInput {
    let lines: Vec<&str> = raw.lines().collect();
    let mut keep = vec![true; lines.len()];
    let mut datetime = None;
    let mut location = None;

    for (idx, line) in lines
        .iter()
        .take(constants::DIRECTIVE_SCAN_LINES)
        .enumerate()
    {
        let trimmed = line.trim();

        if datetime.is_none() {
            if let Some(rest) = trimmed.strip_prefix(constants::DATE_DIRECTIVE_PREFIX) {
                if let Ok(dt) = NaiveDateTime::parse_from_str(
                    rest.trim(),
                    constants::DIRECTIVE_DATETIME_FORMAT,
                ) {
                    datetime = Some(dt);
                    keep[idx] = false;
                    continue;
                }
            }
        }

        if location.is_none() {
            if let Some(rest) = trimmed.strip_prefix(constants::LOCATION_DIRECTIVE_PREFIX) {
                let rest = rest.trim();
                if !rest.is_empty() {
                    location = Some(rest.to_string());
                    keep[idx] = false;
                }
            }
        }
    }

    let body = lines
        .iter()
        .zip(keep)
        .filter(|(_, kept)| *kept)
        .map(|(line, _)| *line)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    ParsedInput {
        datetime,
        location,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_plain_text_passes_through() {
        let parsed = parse("Hi!");
        assert!(parsed.datetime.is_none());
        assert!(parsed.location.is_none());
        assert_eq!(parsed.body, "Hi!");
    }

    #[test]
    fn test_date_directive() {
        let parsed = parse("!2024-01-15 13:30:00\nDear diary.");
        let dt = parsed.datetime.unwrap();
        assert_eq!(
            dt.date(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(dt.hour(), 13);
        assert_eq!(parsed.body, "Dear diary.");
    }

    #[test]
    fn test_location_directive_name() {
        let parsed = parse("@home\nDear diary.");
        assert_eq!(parsed.location.as_deref(), Some("home"));
        assert_eq!(parsed.body, "Dear diary.");
    }

    #[test]
    fn test_location_directive_coordinate_pair() {
        let parsed = parse("@(-14.692110, -75.148877)\nSandstorm today.");
        assert_eq!(
            parsed.location.as_deref(),
            Some("(-14.692110, -75.148877)")
        );
        assert_eq!(parsed.body, "Sandstorm today.");
    }

    #[test]
    fn test_both_directives_either_order() {
        let parsed = parse("!2024-01-15 13:30:00\n@home\nDear diary.");
        assert!(parsed.datetime.is_some());
        assert_eq!(parsed.location.as_deref(), Some("home"));
        assert_eq!(parsed.body, "Dear diary.");

        let parsed = parse("@home\n!2024-01-15 13:30:00\nDear diary.");
        assert!(parsed.datetime.is_some());
        assert_eq!(parsed.location.as_deref(), Some("home"));
        assert_eq!(parsed.body, "Dear diary.");
    }

    #[test]
    fn test_malformed_date_directive_stays_in_body() {
        let parsed = parse("!2024-13-99 99:99:99\nDear diary.");
        assert!(parsed.datetime.is_none());
        assert_eq!(parsed.body, "!2024-13-99 99:99:99\nDear diary.");

        // Wrong format (compact instead of spaced)
        let parsed = parse("!20240115T133000\nDear diary.");
        assert!(parsed.datetime.is_none());
        assert!(parsed.body.starts_with("!20240115T133000"));
    }

    #[test]
    fn test_bare_location_marker_stays_in_body() {
        let parsed = parse("@\nDear diary.");
        assert!(parsed.location.is_none());
        assert_eq!(parsed.body, "@\nDear diary.");
    }

    #[test]
    fn test_directives_past_second_line_are_body() {
        let parsed = parse("First line.\nSecond line.\n@home");
        assert!(parsed.location.is_none());
        assert_eq!(parsed.body, "First line.\nSecond line.\n@home");
    }

    #[test]
    fn test_only_first_directive_of_a_kind_wins() {
        let parsed = parse("@home\n@work\nDear diary.");
        assert_eq!(parsed.location.as_deref(), Some("home"));
        assert_eq!(parsed.body, "@work\nDear diary.");
    }

    #[test]
    fn test_directive_only_input_yields_empty_body() {
        let parsed = parse("@home");
        assert_eq!(parsed.location.as_deref(), Some("home"));
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn test_mid_text_at_sign_is_untouched() {
        let parsed = parse("Mail me at someone@example.org please.");
        assert!(parsed.location.is_none());
        assert_eq!(parsed.body, "Mail me at someone@example.org please.");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let parsed = parse("@home\n\nDear diary.\n");
        assert_eq!(parsed.body, "Dear diary.");
    }
}

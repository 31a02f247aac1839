//! Publication-timestamp parsing for harvested export files.
//!
//! Export dialects carry dates in several shapes: ISO datetime attributes,
//! numeric dates, and French textual dates with an optional weekday and
//! time-of-day ("mardi 4 mars 2014 18:32").

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

/// Datetime formats tried before falling back to date-only formats.
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date-only formats; time defaults to midnight.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y"];

/// Parse a raw date/time string into a naive timestamp.
///
/// Returns `None` when no supported shape matches; the caller decides whether
/// that fails the article or the file.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    parse_textual(raw)
}

/// `[jeudi ]4 mars 2014[ 18:32]` — weekday and time are optional, the day
/// may carry the "1er" ordinal marker.
static TEXTUAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d{1,2})(?:er)?\s+(\p{L}+)\s+(\d{4})(?:\s+(\d{1,2})\s*[:hH]\s*(\d{2}))?",
    )
    .expect("valid regex")
});

fn parse_textual(raw: &str) -> Option<NaiveDateTime> {
    let caps = TEXTUAL_RE.captures(raw)?;

    let day: u32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;

    let hour: u32 = caps.get(4).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let minute: u32 = caps.get(5).map_or(Some(0), |m| m.as_str().parse().ok())?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
}

/// Map a French month name (with or without diacritics) to its number.
fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    let n = match name.as_str() {
        "janvier" => 1,
        "février" | "fevrier" => 2,
        "mars" => 3,
        "avril" => 4,
        "mai" => 5,
        "juin" => 6,
        "juillet" => 7,
        "août" | "aout" => 8,
        "septembre" => 9,
        "octobre" => 10,
        "novembre" => 11,
        "décembre" | "decembre" => 12,
        _ => return None,
    };
    Some(n)
}

//! Permissive timestamp parsing for date-like columns

use crate::table::Cell;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Zoned layouts; parsed values are converted to UTC
const ZONED_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f %z"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

// Month-first wins over day-first for ambiguous slashed dates.
// `%B` also accepts abbreviated month names when parsing.
const DATE_FORMATS: [&str; 14] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%Y %B %d",
    "%B %Y %d",
    "%Y-%B-%d",
    "%d-%B-%Y",
];

/// Parse a timestamp from free-form text, trying each known layout in turn
///
/// Date-only layouts resolve to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    ZONED_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.naive_utc())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Convert one date-like cell
///
/// Missing stays missing, existing timestamps and markers pass through,
/// and anything that is not parseable text becomes [`Cell::Unparseable`].
pub fn parse_date_cell(cell: &Cell) -> Cell {
    if cell.is_missing() {
        return Cell::Null;
    }
    match cell {
        Cell::Timestamp(_) | Cell::Unparseable => cell.clone(),
        Cell::Text(s) => parse_timestamp(s)
            .map(Cell::Timestamp)
            .unwrap_or(Cell::Unparseable),
        _ => Cell::Unparseable,
    }
}

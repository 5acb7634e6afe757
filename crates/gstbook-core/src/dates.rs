//! # Date Conversion
//!
//! The invoice date is typed as compact `DD-MM-YY` text and stored as
//! canonical `YYYY-MM-DD`. The entry date is a plain calendar date that is
//! sent with a midnight time component.
//!
//! ```text
//!   typed          stored           shown again
//!   "5-3-24"  ──►  "2024-03-05" ──► "05-03-24"
//!   "garbage" ──►  "garbage"    ──► "garbage"      (passed through)
//! ```
//!
//! Conversion is lossy outside 2000-2099. Malformed input is passed
//! through unchanged rather than rejected.

use chrono::NaiveDate;

/// Format of a canonical date.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Converts a compact `D-M-YY` invoice date to `YYYY-MM-DD`.
///
/// ## Example
/// ```rust
/// use gstbook_core::dates::compact_to_canonical;
///
/// assert_eq!(compact_to_canonical("5-3-24"), "2024-03-05");
/// assert_eq!(compact_to_canonical("05-03-2024"), "2024-03-05");
/// assert_eq!(compact_to_canonical("20240305"), "20240305");
/// assert_eq!(compact_to_canonical(""), "");
/// ```
pub fn compact_to_canonical(compact: &str) -> String {
    let parts: Vec<&str> = compact.split('-').collect();
    match parts.as_slice() {
        [day, month, year] => {
            let year = if year.chars().count() == 2 {
                format!("20{}", year)
            } else {
                (*year).to_string()
            };
            format!("{}-{:0>2}-{:0>2}", year, month, day)
        }
        _ => compact.to_string(),
    }
}

/// Converts a canonical `YYYY-MM-DD` date back to compact `DD-MM-YY`.
///
/// Anything that is not exactly ten characters, or has fewer than three
/// dash-separated parts, is returned unchanged. Parts after the third are
/// ignored.
pub fn canonical_to_compact(canonical: &str) -> String {
    if canonical.chars().count() != 10 {
        return canonical.to_string();
    }

    let parts: Vec<&str> = canonical.split('-').collect();
    match parts.as_slice() {
        [year, month, day, ..] => {
            let short_year: String = year.chars().skip(2).collect();
            format!("{}-{}-{}", day, month, short_year)
        }
        _ => canonical.to_string(),
    }
}

/// Extracts the calendar date from a stored entry timestamp.
///
/// Takes the first ten characters (`"2024-03-05 00:00:00"` and
/// `"2024-03-05T10:00:00Z"` both work). An empty timestamp yields `today`.
/// Returns `None` when the prefix is not a date.
pub fn entry_date_from_timestamp(timestamp: &str, today: NaiveDate) -> Option<NaiveDate> {
    let prefix: String = timestamp.chars().take(10).collect();
    if prefix.is_empty() {
        return Some(today);
    }
    NaiveDate::parse_from_str(&prefix, CANONICAL_DATE_FORMAT).ok()
}

/// Renders an entry date the way the command layer stores it.
pub fn format_entry_timestamp(date: NaiveDate) -> String {
    format!("{} 00:00:00", date.format(CANONICAL_DATE_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compact_to_canonical_pads_and_prefixes() {
        assert_eq!(compact_to_canonical("15-08-24"), "2024-08-15");
        assert_eq!(compact_to_canonical("1-1-00"), "2000-01-01");
        assert_eq!(compact_to_canonical("31-12-1999"), "1999-12-31");
    }

    #[test]
    fn test_compact_to_canonical_passes_malformed_through() {
        assert_eq!(compact_to_canonical("15/08/24"), "15/08/24");
        assert_eq!(compact_to_canonical("15-08"), "15-08");
        assert_eq!(compact_to_canonical("1-2-3-4"), "1-2-3-4");
    }

    #[test]
    fn test_canonical_to_compact() {
        assert_eq!(canonical_to_compact("2024-08-15"), "15-08-24");
        assert_eq!(canonical_to_compact("2024-8-15"), "2024-8-15");
        assert_eq!(canonical_to_compact("2024/08/15"), "2024/08/15");
        assert_eq!(canonical_to_compact(""), "");
    }

    #[test]
    fn test_canonical_to_compact_uses_first_three_parts() {
        assert_eq!(canonical_to_compact("2024-3-5-1"), "5-3-24");
        assert_eq!(canonical_to_compact("2024-03-5-"), "5-03-24");
        assert_eq!(canonical_to_compact("2024-03051"), "2024-03051");
    }

    #[test]
    fn test_entry_date_from_timestamp() {
        let today = ymd(2024, 6, 1);
        assert_eq!(
            entry_date_from_timestamp("2024-03-05 00:00:00", today),
            Some(ymd(2024, 3, 5))
        );
        assert_eq!(
            entry_date_from_timestamp("2024-03-05T10:15:00Z", today),
            Some(ymd(2024, 3, 5))
        );
        assert_eq!(entry_date_from_timestamp("", today), Some(today));
        assert_eq!(entry_date_from_timestamp("yesterday", today), None);
    }

    #[test]
    fn test_format_entry_timestamp() {
        assert_eq!(format_entry_timestamp(ymd(2024, 3, 5)), "2024-03-05 00:00:00");
    }

    proptest! {
        #[test]
        fn prop_compact_round_trip(day in 1u32..=31, month in 1u32..=12, yy in 0u32..=99) {
            let compact = format!("{:02}-{:02}-{:02}", day, month, yy);
            let canonical = compact_to_canonical(&compact);
            prop_assert_eq!(canonical.len(), 10);
            prop_assert_eq!(canonical_to_compact(&canonical), compact);
        }
    }
}

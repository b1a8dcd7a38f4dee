//! Date parsing shared by snapshot and score payloads.

use chrono::NaiveDate;

// `%y` must precede `%Y`: chrono accepts two-digit input for `%Y` and would
// read `2/18/24` as the year 24.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Parse a date in any of the formats the federation publishes.
///
/// ISO dates are tried first, then `M/D/YY`, then `M/D/YYYY`. Trailing time
/// components (`2024-02-18T00:00:00`) are ignored.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use hitfactor_core::parse_upstream_date;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 2, 18);
/// assert_eq!(parse_upstream_date("2/18/24"), expected);
/// assert_eq!(parse_upstream_date("2024-02-18"), expected);
/// assert_eq!(parse_upstream_date("LIFE"), None);
/// ```
#[must_use]
pub fn parse_upstream_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    if date_part.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

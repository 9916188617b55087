//! Year extraction from the time formats providers emit.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Plausible bounds for an observation year.
const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 2999;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

/// `2020`, `2020.0`, `2020.00`
static YEAR_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})(?:\.0+)?$").unwrap());

/// `2020-03`, `2020-Q1`, `2020Q1`, `2020M03`, `2020-S1`
static YEAR_PERIOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-?(?:\d{2}|[QqSsHh][1-4]|[Mm]\d{1,2}|[Ww]\d{1,2})$").unwrap());

/// `31/12/2020`, `31-12-2020`, `12.31.2020`
static DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}[/.-]\d{1,2}[/.-](\d{4})$").unwrap());

/// Parse an observation time into an integer year.
///
/// Accepts integer and zero-fraction float years, ISO dates and datetimes,
/// month, quarter, half-year and week periods (`2020-03`, `2020-Q1`,
/// `2020M3`) and day-first dates (`31/12/2020`). Anything else is `None`.
pub fn parse_year(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let year = if let Some(caps) = YEAR_NUMBER.captures(value) {
        caps[1].parse().ok()
    } else if let Some(caps) = YEAR_PERIOD.captures(value) {
        caps[1].parse().ok()
    } else if let Some(caps) = DAY_MONTH_YEAR.captures(value) {
        caps[1].parse().ok()
    } else {
        iso_date_year(value)
    }?;

    (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
}

/// Year of an ISO date, optionally followed by a time part.
fn iso_date_year(value: &str) -> Option<i32> {
    let date_part = value.get(..10)?;
    let rest = &value[10..];
    if !rest.is_empty() && !rest.starts_with(['T', ' ']) {
        return None;
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

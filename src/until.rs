//! UNTIL bound parsing.
//!
//! The wire format allows several date shapes for the termination bound. Each
//! shape is a standalone fallible strategy; parsing walks the ordered list and
//! takes the first success, so the fallback policy stays auditable in one
//! place.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// A single fallible way of reading an UNTIL value.
type Strategy = fn(&str) -> Option<NaiveDateTime>;

/// Tried in order, first success wins: basic date, basic date-time, then the
/// generic ISO 8601 shapes.
const STRATEGIES: &[Strategy] = &[
    basic_date,
    basic_date_time,
    iso_date_time,
    rfc3339_date_time,
    iso_date,
];

/// Parses an UNTIL value. Returns `None` when no strategy recognizes the
/// input; the rule parser treats that as "no bound", not as an error.
pub(crate) fn parse_until(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    STRATEGIES.iter().find_map(|parse| parse(value))
}

/// `YYYYMMDD`, taken as midnight.
fn basic_date(value: &str) -> Option<NaiveDateTime> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let date = ymd(&value[0..4], &value[4..6], &value[6..8])?;
    Some(date.and_time(NaiveTime::MIN))
}

/// `YYYYMMDDTHHMMSS` with an optional trailing `Z`, taken as UTC wall time.
fn basic_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.strip_suffix('Z').unwrap_or(value);
    if value.len() != 15 || value.as_bytes().get(8) != Some(&b'T') {
        return None;
    }
    let (date_part, time_part) = (&value[0..8], &value[9..15]);
    if !date_part.bytes().all(|b| b.is_ascii_digit())
        || !time_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let date = ymd(&date_part[0..4], &date_part[4..6], &date_part[6..8])?;
    date.and_hms_opt(
        time_part[0..2].parse().ok()?,
        time_part[2..4].parse().ok()?,
        time_part[4..6].parse().ok()?,
    )
}

/// `YYYY-MM-DDTHH:MM:SS` without an offset.
fn iso_date_time(value: &str) -> Option<NaiveDateTime> {
    value.parse::<NaiveDateTime>().ok()
}

/// RFC 3339 with an offset (`...Z` or `...+09:00`), normalized to UTC.
fn rfc3339_date_time(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_utc())
}

/// `YYYY-MM-DD`, taken as midnight.
fn iso_date(value: &str) -> Option<NaiveDateTime> {
    value
        .parse::<NaiveDate>()
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

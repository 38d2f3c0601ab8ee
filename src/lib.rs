mod consts;
mod next;
mod prelude;
mod types;
mod until;

pub use consts::*;
pub use next::NextOccurrence;
pub use types::{Frequency, Interval, MonthDay, Weekday, WeekdaySet, days_in_month, is_leap_year};

use crate::prelude::*;
use chrono::{NaiveDateTime, NaiveTime};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// A validated recurrence descriptor: the structured form of a rule string
/// like `FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE,FR`.
///
/// Immutable once constructed. Parsing is the only way to obtain one from
/// wire text; [`RecurrenceRule::next_occurrence`] consumes it any number of
/// times without mutating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecurrenceRule {
    frequency: Frequency,
    interval: Interval,
    by_day: Option<WeekdaySet>,
    by_month_day: Option<MonthDay>,
    count: Option<NonZeroU32>,
    until: Option<NaiveDateTime>,
}

/// Error type for rule parsing and component validation.
///
/// Only the mandatory parts can produce one of these; everything optional
/// degrades to a [`DroppedPart`] record instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// Rule text was absent, empty, or all whitespace.
    #[error("Empty rule string")]
    Empty,

    /// No FREQ part was present.
    #[error("Missing FREQ part")]
    MissingFreq,

    /// FREQ named something other than DAILY/WEEKLY/MONTHLY/YEARLY.
    #[error("Unrecognized FREQ value: {0}")]
    UnknownFreq(String),

    /// A weekday code was not one of SU/MO/TU/WE/TH/FR/SA.
    #[error("Unrecognized weekday code: {0}")]
    InvalidWeekday(String),

    /// A day-of-month was outside the valid range.
    #[error("Invalid day of month: {0} (must be {min}-{max})", min = MIN_MONTH_DAY, max = MAX_MONTH_DAY)]
    InvalidMonthDay(u8),

    /// An interval was zero.
    #[error("Invalid interval: {0} (must be at least 1)")]
    InvalidInterval(u32),
}

/// A rule part the lenient parser ignored or replaced with a default.
///
/// Returned alongside the descriptor by [`RecurrenceRule::parse_with_report`]
/// so callers can surface degraded input instead of losing it silently.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DroppedPart {
    /// INTERVAL was non-numeric or below 1; the rule keeps the default of 1
    #[display(fmt = "INTERVAL={_0} defaulted to 1")]
    Interval(String),
    /// COUNT was non-numeric or below 1 and was dropped
    #[display(fmt = "COUNT={_0} dropped")]
    Count(String),
    /// UNTIL matched none of the supported date formats and was dropped
    #[display(fmt = "UNTIL={_0} dropped")]
    Until(String),
    /// A BYDAY entry named no known weekday and was dropped
    #[display(fmt = "BYDAY entry {_0} dropped")]
    ByDayEntry(String),
    /// BYMONTHDAY was outside 1-31 and was dropped
    #[display(fmt = "BYMONTHDAY={_0} dropped")]
    ByMonthDay(String),
    /// The key is not part of the supported dialect; the part was ignored
    #[display(fmt = "unknown key {_0} ignored")]
    UnknownKey(String),
    /// The token had no `=`, or an empty key or value, and was ignored
    #[display(fmt = "malformed token {_0} ignored")]
    MalformedToken(String),
}

impl RecurrenceRule {
    /// Creates a bare rule with the given frequency, interval 1, and nothing
    /// else set
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: Interval::ONE,
            by_day: None,
            by_month_day: None,
            count: None,
            until: None,
        }
    }

    /// Replaces the interval
    pub const fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    /// Replaces the weekday selection; an empty set means no selection
    pub const fn with_by_day(mut self, days: WeekdaySet) -> Self {
        self.by_day = if days.is_empty() { None } else { Some(days) };
        self
    }

    /// Replaces the day-of-month selection
    pub const fn with_by_month_day(mut self, day: MonthDay) -> Self {
        self.by_month_day = Some(day);
        self
    }

    /// Replaces the occurrence cap
    pub const fn with_count(mut self, count: NonZeroU32) -> Self {
        self.count = Some(count);
        self
    }

    /// Replaces the termination bound
    pub const fn with_until(mut self, until: NaiveDateTime) -> Self {
        self.until = Some(until);
        self
    }

    /// How often the rule repeats
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Step between occurrences, in units of the frequency; always >= 1
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    /// Weekday selection (WEEKLY rules); never empty when present
    pub const fn by_day(&self) -> Option<WeekdaySet> {
        self.by_day
    }

    /// Day-of-month selection (MONTHLY rules)
    pub const fn by_month_day(&self) -> Option<MonthDay> {
        self.by_month_day
    }

    /// Occurrence cap, carried for callers that track how many occurrences
    /// have happened. The calculator itself never consults it.
    pub const fn count(&self) -> Option<NonZeroU32> {
        self.count
    }

    /// Inclusive termination bound: no occurrence strictly after this
    /// instant is valid
    pub const fn until(&self) -> Option<NaiveDateTime> {
        self.until
    }

    /// Whether `text` parses as a valid rule. Boundary-validation
    /// convenience, equivalent to `text.parse::<RecurrenceRule>().is_ok()`.
    pub fn is_valid(text: &str) -> bool {
        text.parse::<Self>().is_ok()
    }

    /// Parses a rule string and reports every part that was ignored or
    /// defaulted along the way.
    ///
    /// The parser is lenient about everything except FREQ: malformed tokens,
    /// unknown keys, bad intervals, unparseable UNTIL values and out-of-range
    /// selectors all degrade to their defaults, each leaving a
    /// [`DroppedPart`] in the report. A rule with no recognizable FREQ is
    /// rejected outright — a typo must not silently mean "no recurrence".
    ///
    /// # Errors
    /// Returns `RuleError::Empty` for blank input, `RuleError::MissingFreq`
    /// when no FREQ part is present, and `RuleError::UnknownFreq` when FREQ
    /// names an unsupported frequency.
    pub fn parse_with_report(text: &str) -> Result<(Self, Vec<DroppedPart>), RuleError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RuleError::Empty);
        }

        let mut dropped = Vec::new();
        let mut frequency = None;
        let mut interval = Interval::ONE;
        let mut by_day = None;
        let mut by_month_day = None;
        let mut count = None;
        let mut until = None;

        for token in trimmed.split(PART_SEPARATOR) {
            let Some((raw_key, raw_value)) = token.split_once(KEY_VALUE_SEPARATOR) else {
                if !token.trim().is_empty() {
                    dropped.push(DroppedPart::MalformedToken(token.trim().to_owned()));
                }
                continue;
            };

            let key = raw_key.trim().to_ascii_uppercase();
            let value = raw_value.trim();
            if key.is_empty() || value.is_empty() {
                dropped.push(DroppedPart::MalformedToken(token.trim().to_owned()));
                continue;
            }

            // Recognized keys may repeat; the last occurrence wins.
            match key.as_str() {
                KEY_FREQ => frequency = Some(value.parse::<Frequency>()?),
                KEY_INTERVAL => match value.parse::<u32>().ok().and_then(|v| Interval::new(v).ok())
                {
                    Some(parsed) => interval = parsed,
                    None => dropped.push(DroppedPart::Interval(value.to_owned())),
                },
                KEY_COUNT => match value.parse::<u32>().ok().and_then(NonZeroU32::new) {
                    Some(parsed) => count = Some(parsed),
                    None => dropped.push(DroppedPart::Count(value.to_owned())),
                },
                KEY_UNTIL => match until::parse_until(value) {
                    Some(parsed) => until = Some(parsed),
                    None => dropped.push(DroppedPart::Until(value.to_owned())),
                },
                KEY_BYDAY => {
                    let mut set = WeekdaySet::new();
                    for entry in value.split(LIST_SEPARATOR) {
                        match strip_ordinal(entry.trim()).parse::<Weekday>() {
                            Ok(day) => set.insert(day),
                            Err(_) => {
                                dropped.push(DroppedPart::ByDayEntry(entry.trim().to_owned()));
                            }
                        }
                    }
                    // a fully unrecognized list reverts to "no selection",
                    // never to an empty-but-present set
                    by_day = if set.is_empty() { None } else { Some(set) };
                }
                KEY_BYMONTHDAY => match value.parse::<u8>().ok().and_then(|v| MonthDay::new(v).ok())
                {
                    Some(parsed) => by_month_day = Some(parsed),
                    None => dropped.push(DroppedPart::ByMonthDay(value.to_owned())),
                },
                _ => dropped.push(DroppedPart::UnknownKey(key)),
            }
        }

        let frequency = frequency.ok_or(RuleError::MissingFreq)?;

        Ok((
            Self {
                frequency,
                interval,
                by_day,
                by_month_day,
                count,
                until,
            },
            dropped,
        ))
    }
}

/// Strips the optional sign and ordinal digits off a BYDAY entry, so `-1MO`
/// and `+2TU` match their plain weekday codes.
fn strip_ordinal(entry: &str) -> &str {
    let entry = entry.strip_prefix(['+', '-']).unwrap_or(entry);
    entry.trim_start_matches(|c: char| c.is_ascii_digit())
}

impl FromStr for RecurrenceRule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_report(s).map(|(rule, _)| rule)
    }
}

impl fmt::Display for RecurrenceRule {
    /// Renders the canonical wire form. INTERVAL is omitted when it is the
    /// default of 1; optional parts are omitted when absent. The output
    /// round-trips through `FromStr`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", KEY_FREQ, KEY_VALUE_SEPARATOR, self.frequency)?;
        if self.interval.get() != 1 {
            write!(
                f,
                "{}{}{}{}",
                PART_SEPARATOR, KEY_INTERVAL, KEY_VALUE_SEPARATOR, self.interval
            )?;
        }
        if let Some(days) = self.by_day {
            write!(
                f,
                "{}{}{}{}",
                PART_SEPARATOR, KEY_BYDAY, KEY_VALUE_SEPARATOR, days
            )?;
        }
        if let Some(day) = self.by_month_day {
            write!(
                f,
                "{}{}{}{}",
                PART_SEPARATOR, KEY_BYMONTHDAY, KEY_VALUE_SEPARATOR, day
            )?;
        }
        if let Some(count) = self.count {
            write!(
                f,
                "{}{}{}{}",
                PART_SEPARATOR, KEY_COUNT, KEY_VALUE_SEPARATOR, count
            )?;
        }
        if let Some(until) = self.until {
            write!(f, "{}{}{}", PART_SEPARATOR, KEY_UNTIL, KEY_VALUE_SEPARATOR)?;
            if until.time() == NaiveTime::MIN {
                write!(f, "{}", until.format(UNTIL_DATE_FORMAT))?;
            } else {
                write!(f, "{}Z", until.format(UNTIL_DATE_TIME_FORMAT))?;
            }
        }
        Ok(())
    }
}

impl serde::Serialize for RecurrenceRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for RecurrenceRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

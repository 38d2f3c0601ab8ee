use chrono::{Datelike, Days, Months, NaiveDateTime, NaiveTime};

use crate::RecurrenceRule;
use crate::consts::{DAYS_PER_WEEK, MONTHS_PER_YEAR};
use crate::types::{Frequency, Interval, MonthDay, Weekday, WeekdaySet};

/// Outcome of asking a rule for the occurrence after a base instant.
///
/// `Ended` is a normal result, not an error: the rule itself was valid, the
/// series just has nothing left. Callers typically deactivate the schedule
/// when they see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NextOccurrence {
    /// The next occurrence falls at this instant
    At(NaiveDateTime),
    /// The recurrence has terminated: the candidate fell after the UNTIL
    /// bound (or past the supported calendar range)
    Ended,
}

impl NextOccurrence {
    /// Returns the occurrence instant, or `None` when the series has ended
    pub const fn as_datetime(self) -> Option<NaiveDateTime> {
        match self {
            Self::At(instant) => Some(instant),
            Self::Ended => None,
        }
    }

    /// Whether the series has terminated
    pub const fn is_ended(self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl From<NextOccurrence> for Option<NaiveDateTime> {
    fn from(occurrence: NextOccurrence) -> Self {
        occurrence.as_datetime()
    }
}

impl RecurrenceRule {
    /// Computes the occurrence that follows `base` (typically the last
    /// completed occurrence, or the plan start).
    ///
    /// Pure and deterministic: feeding the result back in as the new base
    /// always advances strictly, so chained re-evaluation never stalls.
    /// The `count` cap is deliberately not consulted here — this function is
    /// stateless and cannot know how many occurrences have already happened;
    /// callers that track that enforce the cap via [`Self::count`].
    pub fn next_occurrence(&self, base: NaiveDateTime) -> NextOccurrence {
        let interval = self.interval();
        let candidate = match self.frequency() {
            Frequency::Daily => step_days(base, u64::from(interval.get())),
            Frequency::Weekly => match self.by_day() {
                Some(days) => next_weekday(base, days, interval),
                None => step_days(base, u64::from(DAYS_PER_WEEK) * u64::from(interval.get())),
            },
            Frequency::Monthly => match self.by_month_day() {
                Some(day) => next_month_day(base, day, interval),
                None => base.checked_add_months(Months::new(interval.get())),
            },
            Frequency::Yearly => interval
                .get()
                .checked_mul(MONTHS_PER_YEAR)
                .and_then(|months| base.checked_add_months(Months::new(months))),
        };

        match candidate {
            Some(next) if self.until().is_none_or(|until| next <= until) => {
                NextOccurrence::At(next)
            }
            _ => NextOccurrence::Ended,
        }
    }
}

fn step_days(base: NaiveDateTime, days: u64) -> Option<NaiveDateTime> {
    base.checked_add_days(Days::new(days))
}

/// Weekly BYDAY search.
///
/// The smallest target weekday strictly after the base weekday wins within
/// the same week (time of day preserved). When the base sits on or after the
/// last target, the result is the first target weekday of the week `interval`
/// weeks ahead, at midnight — the wrap rewinds to that week's Sunday, so the
/// time of day does not survive the week boundary.
fn next_weekday(
    base: NaiveDateTime,
    days: WeekdaySet,
    interval: Interval,
) -> Option<NaiveDateTime> {
    let current = Weekday::from_chrono(base.weekday());
    if let Some(target) = days.next_after(current) {
        let ahead = u64::from(target.index() - current.index());
        return base.checked_add_days(Days::new(ahead));
    }

    let first = days.first()?;
    let in_target_week = base
        .date()
        .checked_add_days(Days::new(u64::from(DAYS_PER_WEEK) * u64::from(interval.get())))?;
    let week_start = in_target_week.checked_sub_days(Days::new(u64::from(
        in_target_week.weekday().num_days_from_sunday(),
    )))?;
    let date = week_start.checked_add_days(Days::new(u64::from(first.index())))?;
    Some(date.and_time(NaiveTime::MIN))
}

/// Monthly BYMONTHDAY search.
///
/// The requested day is clamped to each candidate month's length before the
/// comparison, so a base on the last day of a short month still advances to
/// the next month instead of landing on itself.
fn next_month_day(base: NaiveDateTime, day: MonthDay, interval: Interval) -> Option<NaiveDateTime> {
    let target = day.clamped_for(base.year(), base.month());
    if base.day() < target {
        return base.with_day(target);
    }

    let shifted = base.checked_add_months(Months::new(interval.get()))?;
    let target = day.clamped_for(shifted.year(), shifted.month());
    shifted.with_day(target)
}

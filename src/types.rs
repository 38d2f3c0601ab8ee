use crate::RuleError;
use crate::consts::{
    CENTURY_CYCLE, DAY_CODE_FR, DAY_CODE_MO, DAY_CODE_SA, DAY_CODE_SU, DAY_CODE_TH, DAY_CODE_TU,
    DAY_CODE_WE, DAYS_IN_MONTH, DAYS_PER_WEEK, FEBRUARY, FEBRUARY_DAYS_LEAP, FREQ_DAILY,
    FREQ_MONTHLY, FREQ_WEEKLY, FREQ_YEARLY, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE, LIST_SEPARATOR,
    MAX_MONTH, MAX_MONTH_DAY,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::{NonZeroU8, NonZeroU32};
use std::str::FromStr;

/// How often a rule repeats.
///
/// This is a closed set: a descriptor can only exist with one of these four
/// values, so the per-frequency stepping logic is exhaustively checked at
/// compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// Every `interval` days
    Daily,
    /// Every `interval` weeks, optionally on specific weekdays
    Weekly,
    /// Every `interval` months, optionally on a specific day of month
    Monthly,
    /// Every `interval` years
    Yearly,
}

impl Frequency {
    /// Canonical wire-format name (`DAILY`, `WEEKLY`, `MONTHLY`, `YEARLY`)
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => FREQ_DAILY,
            Self::Weekly => FREQ_WEEKLY,
            Self::Monthly => FREQ_MONTHLY,
            Self::Yearly => FREQ_YEARLY,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = RuleError;

    /// Matches the wire-format names case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            FREQ_DAILY => Ok(Self::Daily),
            FREQ_WEEKLY => Ok(Self::Weekly),
            FREQ_MONTHLY => Ok(Self::Monthly),
            FREQ_YEARLY => Ok(Self::Yearly),
            _ => Err(RuleError::UnknownFreq(s.trim().to_owned())),
        }
    }
}

/// Day of the week, indexed `0=Sunday..6=Saturday` like the rule dialect's
/// BYDAY values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    /// `SU`, index 0
    Sunday = 0,
    /// `MO`, index 1
    Monday = 1,
    /// `TU`, index 2
    Tuesday = 2,
    /// `WE`, index 3
    Wednesday = 3,
    /// `TH`, index 4
    Thursday = 4,
    /// `FR`, index 5
    Friday = 5,
    /// `SA`, index 6
    Saturday = 6,
}

impl Weekday {
    /// Returns the weekday index, 0=Sunday through 6=Saturday
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Looks a weekday up by its index (0=Sunday .. 6=Saturday)
    pub const fn from_index(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Sunday),
            1 => Some(Self::Monday),
            2 => Some(Self::Tuesday),
            3 => Some(Self::Wednesday),
            4 => Some(Self::Thursday),
            5 => Some(Self::Friday),
            6 => Some(Self::Saturday),
            _ => None,
        }
    }

    /// Converts from chrono's weekday type (which numbers from Monday)
    pub const fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Self::Sunday,
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
        }
    }

    /// Two-letter wire-format code (`SU` .. `SA`)
    pub const fn code(self) -> &'static str {
        match self {
            Self::Sunday => DAY_CODE_SU,
            Self::Monday => DAY_CODE_MO,
            Self::Tuesday => DAY_CODE_TU,
            Self::Wednesday => DAY_CODE_WE,
            Self::Thursday => DAY_CODE_TH,
            Self::Friday => DAY_CODE_FR,
            Self::Saturday => DAY_CODE_SA,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Weekday {
    type Err = RuleError;

    /// Matches a bare two-letter code case-insensitively. Ordinal prefixes
    /// (`-1MO`) are the rule parser's concern, not this type's.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            DAY_CODE_SU => Ok(Self::Sunday),
            DAY_CODE_MO => Ok(Self::Monday),
            DAY_CODE_TU => Ok(Self::Tuesday),
            DAY_CODE_WE => Ok(Self::Wednesday),
            DAY_CODE_TH => Ok(Self::Thursday),
            DAY_CODE_FR => Ok(Self::Friday),
            DAY_CODE_SA => Ok(Self::Saturday),
            _ => Err(RuleError::InvalidWeekday(s.trim().to_owned())),
        }
    }
}

/// A set of weekdays stored as a bitmask.
///
/// Order-insensitive, duplicates collapse; iteration is always ascending from
/// Sunday, which is the order the occurrence search relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Creates an empty set
    pub const fn new() -> Self {
        Self(0)
    }

    /// Adds a weekday to the set
    pub const fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.index();
    }

    /// Whether the set contains the given weekday
    pub const fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.index()) != 0
    }

    /// Whether the set holds no weekdays
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of weekdays in the set
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Lowest-indexed weekday in the set
    pub const fn first(self) -> Option<Weekday> {
        Self::lowest(self.0)
    }

    /// Smallest weekday in the set with an index strictly greater than `day`,
    /// or `None` when `day` is on or after the last member
    pub const fn next_after(self, day: Weekday) -> Option<Weekday> {
        let below_and_self = (1u8 << (day.index() + 1)) - 1;
        Self::lowest(self.0 & !below_and_self)
    }

    /// Iterates the members in ascending index order
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        (0..DAYS_PER_WEEK).filter_map(move |index| {
            if self.0 & (1 << index) != 0 {
                Weekday::from_index(index)
            } else {
                None
            }
        })
    }

    const fn lowest(bits: u8) -> Option<Weekday> {
        if bits == 0 {
            None
        } else {
            Weekday::from_index(bits.trailing_zeros() as u8)
        }
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<T: IntoIterator<Item = Weekday>>(iter: T) -> Self {
        let mut set = Self::new();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for day in self.iter() {
            if !first {
                write!(f, "{LIST_SEPARATOR}")?;
            }
            write!(f, "{day}")?;
            first = false;
        }
        Ok(())
    }
}

/// A day-of-month selector guaranteed to be in the range `1..=31`.
/// Uses `NonZeroU8` internally, so 0 is not a valid day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MonthDay(NonZeroU8);

impl MonthDay {
    /// Creates a new `MonthDay`, validating that it's non-zero and <= `MAX_MONTH_DAY`
    ///
    /// # Errors
    /// Returns `RuleError::InvalidMonthDay` if the value is 0 or > `MAX_MONTH_DAY`.
    pub fn new(value: u8) -> Result<Self, RuleError> {
        let non_zero = NonZeroU8::new(value).ok_or(RuleError::InvalidMonthDay(value))?;
        if value > MAX_MONTH_DAY {
            return Err(RuleError::InvalidMonthDay(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Returns the day clamped to the length of the given month, so a
    /// `BYMONTHDAY=31` rule lands on Feb 28/29 instead of spilling over
    pub fn clamped_for(self, year: i32, month: u32) -> u32 {
        u32::from(self.get().min(days_in_month(year, month)))
    }
}

impl TryFrom<u8> for MonthDay {
    type Error = RuleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MonthDay> for u8 {
    fn from(day: MonthDay) -> Self {
        day.0.get()
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Step between occurrences, in units of the rule's frequency.
/// Uses `NonZeroU32` internally, so 0 is not a valid interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Interval(NonZeroU32);

impl Interval {
    /// The default step of 1
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Creates a new `Interval`, validating that it's non-zero
    ///
    /// # Errors
    /// Returns `RuleError::InvalidInterval` if the value is 0.
    pub fn new(value: u32) -> Result<Self, RuleError> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(RuleError::InvalidInterval(value))
    }

    /// Returns the interval value as u32
    #[inline]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Interval {
    type Error = RuleError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Interval> for u32 {
    fn from(interval: Interval) -> Self {
        interval.0.get()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Helper functions

pub const fn is_leap_year(year: i32) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: i32, month: u32) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_parse_case_insensitive() {
        assert_eq!("DAILY".parse::<Frequency>().unwrap(), Frequency::Daily);
        assert_eq!("weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!("Monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!(" YEARLY ".parse::<Frequency>().unwrap(), Frequency::Yearly);
    }

    #[test]
    fn test_frequency_parse_invalid() {
        let result = "HOURLY".parse::<Frequency>();
        assert!(matches!(result, Err(RuleError::UnknownFreq(_))));

        let result = "NONSENSE".parse::<Frequency>();
        assert!(matches!(result, Err(RuleError::UnknownFreq(_))));
    }

    #[test]
    fn test_frequency_display() {
        assert_eq!(Frequency::Daily.to_string(), "DAILY");
        assert_eq!(Frequency::Weekly.to_string(), "WEEKLY");
        assert_eq!(Frequency::Monthly.to_string(), "MONTHLY");
        assert_eq!(Frequency::Yearly.to_string(), "YEARLY");
    }

    #[test]
    fn test_weekday_index_round_trip() {
        for index in 0..7 {
            let day = Weekday::from_index(index).unwrap();
            assert_eq!(day.index(), index);
        }
        assert_eq!(Weekday::from_index(7), None);
    }

    #[test]
    fn test_weekday_parse() {
        assert_eq!("SU".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert_eq!("mo".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!(" Fr ".parse::<Weekday>().unwrap(), Weekday::Friday);

        let result = "XX".parse::<Weekday>();
        assert!(matches!(result, Err(RuleError::InvalidWeekday(_))));
    }

    #[test]
    fn test_weekday_display() {
        assert_eq!(Weekday::Sunday.to_string(), "SU");
        assert_eq!(Weekday::Wednesday.to_string(), "WE");
        assert_eq!(Weekday::Saturday.to_string(), "SA");
    }

    #[test]
    fn test_weekday_from_chrono() {
        assert_eq!(Weekday::from_chrono(chrono::Weekday::Sun), Weekday::Sunday);
        assert_eq!(
            Weekday::from_chrono(chrono::Weekday::Wed),
            Weekday::Wednesday
        );
        assert_eq!(
            Weekday::from_chrono(chrono::Weekday::Sat),
            Weekday::Saturday
        );
    }

    #[test]
    fn test_weekday_set_insert_and_contains() {
        let mut set = WeekdaySet::new();
        assert!(set.is_empty());

        set.insert(Weekday::Wednesday);
        set.insert(Weekday::Monday);
        set.insert(Weekday::Monday); // duplicates collapse

        assert_eq!(set.len(), 2);
        assert!(set.contains(Weekday::Monday));
        assert!(set.contains(Weekday::Wednesday));
        assert!(!set.contains(Weekday::Friday));
    }

    #[test]
    fn test_weekday_set_iterates_ascending() {
        let set: WeekdaySet = [Weekday::Friday, Weekday::Monday, Weekday::Wednesday]
            .into_iter()
            .collect();

        let days: Vec<Weekday> = set.iter().collect();
        assert_eq!(
            days,
            vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday]
        );
    }

    #[test]
    fn test_weekday_set_first() {
        let set: WeekdaySet = [Weekday::Friday, Weekday::Tuesday].into_iter().collect();
        assert_eq!(set.first(), Some(Weekday::Tuesday));

        assert_eq!(WeekdaySet::new().first(), None);
    }

    #[test]
    fn test_weekday_set_next_after() {
        let set: WeekdaySet = [Weekday::Monday, Weekday::Wednesday, Weekday::Friday]
            .into_iter()
            .collect();

        assert_eq!(set.next_after(Weekday::Sunday), Some(Weekday::Monday));
        assert_eq!(set.next_after(Weekday::Monday), Some(Weekday::Wednesday));
        assert_eq!(set.next_after(Weekday::Wednesday), Some(Weekday::Friday));
        // strictly greater: a member does not match itself
        assert_eq!(set.next_after(Weekday::Friday), None);
        assert_eq!(set.next_after(Weekday::Saturday), None);
    }

    #[test]
    fn test_weekday_set_display() {
        let set: WeekdaySet = [Weekday::Friday, Weekday::Monday, Weekday::Wednesday]
            .into_iter()
            .collect();
        assert_eq!(set.to_string(), "MO,WE,FR");

        assert_eq!(WeekdaySet::new().to_string(), "");
    }

    #[test]
    fn test_month_day_new_valid() {
        assert!(MonthDay::new(1).is_ok());
        assert!(MonthDay::new(15).is_ok());
        assert!(MonthDay::new(31).is_ok());
    }

    #[test]
    fn test_month_day_new_invalid() {
        assert!(matches!(
            MonthDay::new(0),
            Err(RuleError::InvalidMonthDay(0))
        ));
        assert!(matches!(
            MonthDay::new(32),
            Err(RuleError::InvalidMonthDay(32))
        ));
    }

    #[test]
    fn test_month_day_clamped_for() {
        let day = MonthDay::new(31).unwrap();
        assert_eq!(day.clamped_for(2025, 1), 31);
        assert_eq!(day.clamped_for(2025, 2), 28);
        assert_eq!(day.clamped_for(2024, 2), 29);
        assert_eq!(day.clamped_for(2025, 4), 30);

        let day = MonthDay::new(10).unwrap();
        assert_eq!(day.clamped_for(2025, 2), 10);
    }

    #[test]
    fn test_month_day_serde() {
        let day = MonthDay::new(15).unwrap();
        let json = serde_json::to_string(&day).unwrap();
        assert_eq!(json, "15");

        let parsed: MonthDay = serde_json::from_str(&json).unwrap();
        assert_eq!(day, parsed);

        let result: Result<MonthDay, _> = serde_json::from_str("40");
        assert!(result.is_err());
    }

    #[test]
    fn test_interval_default_is_one() {
        assert_eq!(Interval::default().get(), 1);
        assert_eq!(Interval::ONE.get(), 1);
    }

    #[test]
    fn test_interval_new() {
        assert_eq!(Interval::new(3).unwrap().get(), 3);
        assert!(matches!(
            Interval::new(0),
            Err(RuleError::InvalidInterval(0))
        ));
    }

    #[test]
    fn test_interval_serde() {
        let interval = Interval::new(2).unwrap();
        let json = serde_json::to_string(&interval).unwrap();
        assert_eq!(json, "2");

        let parsed: Interval = serde_json::from_str(&json).unwrap();
        assert_eq!(interval, parsed);

        let result: Result<Interval, _> = serde_json::from_str("0");
        assert!(result.is_err());
    }

    #[test]
    fn test_is_leap_year_cases() {
        assert!(is_leap_year(2020));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2021));
        assert!(!is_leap_year(2023));

        // Century years not divisible by 400
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2100));

        // Divisible by 400
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2400));
    }

    #[test]
    fn test_days_in_month_31_day_months() {
        for month in [1, 3, 5, 7, 8, 10, 12] {
            assert_eq!(
                days_in_month(2024, month),
                31,
                "Month {month} should have 31 days"
            );
        }
    }

    #[test]
    fn test_days_in_month_30_day_months() {
        for month in [4, 6, 9, 11] {
            assert_eq!(
                days_in_month(2024, month),
                30,
                "Month {month} should have 30 days"
            );
        }
    }

    #[test]
    fn test_days_in_month_february() {
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28, "Century not divisible by 400");
        assert_eq!(days_in_month(2000, 2), 29, "Century divisible by 400");
    }
}

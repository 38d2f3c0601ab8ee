/// Separator between the parts of a rule string (`FREQ=DAILY;INTERVAL=2`)
pub const PART_SEPARATOR: char = ';';

/// Separator between a part's key and its value
pub const KEY_VALUE_SEPARATOR: char = '=';

/// Separator between the entries of a list-valued part (`MO,WE,FR`)
pub const LIST_SEPARATOR: char = ',';

/// Key of the mandatory frequency part
pub const KEY_FREQ: &str = "FREQ";
/// Key of the step-between-occurrences part
pub const KEY_INTERVAL: &str = "INTERVAL";
/// Key of the weekday-selection part (WEEKLY rules)
pub const KEY_BYDAY: &str = "BYDAY";
/// Key of the day-of-month-selection part (MONTHLY rules)
pub const KEY_BYMONTHDAY: &str = "BYMONTHDAY";
/// Key of the occurrence-cap part
pub const KEY_COUNT: &str = "COUNT";
/// Key of the termination-bound part
pub const KEY_UNTIL: &str = "UNTIL";

/// Frequency value for daily recurrence
pub const FREQ_DAILY: &str = "DAILY";
/// Frequency value for weekly recurrence
pub const FREQ_WEEKLY: &str = "WEEKLY";
/// Frequency value for monthly recurrence
pub const FREQ_MONTHLY: &str = "MONTHLY";
/// Frequency value for yearly recurrence
pub const FREQ_YEARLY: &str = "YEARLY";

/// Two-letter weekday code for Sunday
pub const DAY_CODE_SU: &str = "SU";
/// Two-letter weekday code for Monday
pub const DAY_CODE_MO: &str = "MO";
/// Two-letter weekday code for Tuesday
pub const DAY_CODE_TU: &str = "TU";
/// Two-letter weekday code for Wednesday
pub const DAY_CODE_WE: &str = "WE";
/// Two-letter weekday code for Thursday
pub const DAY_CODE_TH: &str = "TH";
/// Two-letter weekday code for Friday
pub const DAY_CODE_FR: &str = "FR";
/// Two-letter weekday code for Saturday
pub const DAY_CODE_SA: &str = "SA";

/// UNTIL format: basic calendar date (`YYYYMMDD`)
pub const UNTIL_DATE_FORMAT: &str = "%Y%m%d";
/// UNTIL format: basic combined date-time (`YYYYMMDDTHHMMSS`)
pub const UNTIL_DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Smallest valid BYMONTHDAY value
pub const MIN_MONTH_DAY: u8 = 1;
/// Largest valid BYMONTHDAY value
pub const MAX_MONTH_DAY: u8 = 31;

/// Number of weekdays, and the week stepping unit for WEEKLY rules
pub const DAYS_PER_WEEK: u8 = 7;
/// Month stepping unit for YEARLY rules
pub const MONTHS_PER_YEAR: u32 = 12;

/// Month number for February
pub const FEBRUARY: u32 = 2;
/// Maximum valid month (December)
pub const MAX_MONTH: u32 = 12;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

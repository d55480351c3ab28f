//! Gregorian day-count calendar anchored at 1970-01-01.
//!
//! All functions here operate on plain signed day counts, no floating point
//! and no time zones. The year arithmetic is based on the number of days
//! before a given year since 0001-01-01, re-anchored to the Unix epoch:
//! 719,162 days and 477 leap years separate 0001-01-01 from 1970-01-01.

use crate::divmod::floor_div;

/// Days in a non-leap year.
pub const DAYS_IN_YEAR: i64 = 365;
/// Days in a leap year.
pub const DAYS_IN_LEAP_YEAR: i64 = 366;

const YEARS_TO_EPOCH: i64 = 1970;
const DAYS_TO_EPOCH: i64 = 719_162;
const LEAP_YEARS_TO_EPOCH: i64 = 477;

const MONTH_DAYS: [i32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const MONTH_DAYS_LEAP: [i32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Calendar breakdown of a day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateComponents {
    /// Years since 1970 (0 for 1970, -1 for 1969).
    pub year_offset: i32,
    /// Month of the year in `0..=11`.
    pub month: i32,
    /// Day of the month in `1..=31`.
    pub day: i32,
    /// Day of the year in `0..=365`.
    pub yday: i32,
}

/// Whether `year` (the calendar year, not an epoch offset) is a leap year.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days between 1970-01-01 and the start of the year `year_offset` years
/// after 1970. Negative for years before the epoch.
pub fn days_before_year(year_offset: i32) -> i64 {
    let year = year_offset as i64 + YEARS_TO_EPOCH - 1;

    let days = year * 365 + floor_div(year, 4) - floor_div(year, 100) + floor_div(year, 400);

    days - DAYS_TO_EPOCH
}

/// Leap years from 0001 through the year `year_offset` years after 1970,
/// re-anchored so the count is 0 at the epoch year.
pub fn leap_years_through(year_offset: i32) -> i64 {
    let year = year_offset as i64 + YEARS_TO_EPOCH;

    floor_div(year, 4) - floor_div(year, 100) + floor_div(year, 400) - LEAP_YEARS_TO_EPOCH
}

/// Break a day count since 1970-01-01 into calendar components.
///
/// Exact inverse of [`days_before_year`] plus day-of-year: for every `d`,
/// `days_before_year(c.year_offset) + c.yday == d`.
pub fn date_components(days: i64) -> DateComponents {
    // First guess from the 400-year cycle (146,097 days), then correct.
    // The estimate is off by at most one year on either side.
    let mut year_offset = floor_div(days * 400, 146_097) as i32;

    while days_before_year(year_offset + 1) <= days {
        year_offset += 1;
    }
    while days_before_year(year_offset) > days {
        year_offset -= 1;
    }

    let yday = (days - days_before_year(year_offset)) as i32;

    let month_days = if is_leap_year(year_offset + 1970) {
        &MONTH_DAYS_LEAP
    } else {
        &MONTH_DAYS
    };

    let mut month = 0;
    let mut day = yday;
    while day >= month_days[month as usize] {
        day -= month_days[month as usize];
        month += 1;
    }

    DateComponents {
        year_offset,
        month,
        day: day + 1,
        yday,
    }
}

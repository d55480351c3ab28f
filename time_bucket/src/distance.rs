//! The bucketing engine.
//!
//! [`distance`] maps every slot of a column to the index of the
//! period-of-width-`every` bucket it falls in, relative to an origin:
//!
//! - One stable epoch: Unix (1970-01-01), with the origin defaulting to the
//!   epoch read in the column's own zone.
//! - Fixed-width periods (hour/minute/second/millisecond): second-based
//!   math on 64-bit counts.
//! - Calendar periods (year/quarter/month): linear year/month indexing
//!   relative to 1970-01.
//! - Year-aligned periods (yday/yweek): day-of-year math that compensates
//!   for leap days after February 28.
//!
//! Buckets are emitted as `f64` (`NaN` for missing slots) so the
//! exactly-representable integer range of a double bounds the output.

use tracing::debug;

use crate::calendar::{DAYS_IN_LEAP_YEAR, DAYS_IN_YEAR, days_before_year, is_leap_year,
    leap_years_through};
use crate::column::TimeColumn;
use crate::divmod::floor_div;
use crate::error::Error;
use crate::offset::{YdayPoint, day_offsets, instant_milliseconds, instant_seconds,
    month_offsets, origin_days, origin_milliseconds, origin_month_offset, origin_seconds,
    origin_yday, origin_year_offset, yday_points, year_offsets};
use crate::period::Period;

/// Seconds in one minute.
pub const SECS_PER_MINUTE: i64 = 60;
/// Seconds in one hour.
pub const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
/// Seconds in one day.
pub const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;
/// Milliseconds in one day.
pub const MILLIS_PER_DAY: i64 = SECS_PER_DAY * 1_000;
/// Hours in one day.
pub const HOURS_PER_DAY: i64 = 24;
/// Minutes in one day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;
/// Days in one week.
pub const DAYS_PER_WEEK: i64 = 7;
/// Months in one quarter.
pub const MONTHS_PER_QUARTER: i64 = 3;

/// Bucket index of every slot of `x`, relative to `origin`.
///
/// Equal outputs mean "same bucket"; the signed difference between two
/// outputs is the count of whole `every`-wide periods between the buckets
/// holding them. Missing or non-finite slots come back as `NaN`. With no
/// `origin`, buckets anchor to the epoch as read in `x`'s zone; otherwise
/// `x` is re-read in the origin's zone first.
pub fn distance(
    x: &TimeColumn,
    period: Period,
    every: i32,
    origin: Option<&TimeColumn>,
) -> Result<Vec<f64>, Error> {
    let every = validate_every(every)?;
    if let Some(origin) = origin {
        validate_origin(origin)?;
    }

    debug!(%period, every, len = x.len(), "computing bucket distances");

    let x_converted;
    let origin_resolved;
    let (x, origin): (&TimeColumn, &TimeColumn) = match origin {
        None => {
            origin_resolved = TimeColumn::epoch_origin(x.time_zone());
            (x, &origin_resolved)
        }
        Some(origin) => {
            x_converted = x.convert_time_zone(origin.time_zone());
            (&x_converted, origin)
        }
    };

    match period {
        Period::Year => distance_year(x, every, origin),
        Period::Quarter => distance_month(x, every * MONTHS_PER_QUARTER, origin),
        Period::Month => distance_month(x, every, origin),
        Period::Week => distance_day(x, every * DAYS_PER_WEEK, origin),
        Period::Day => distance_day(x, every, origin),
        Period::Yweek => distance_yday(x, every * DAYS_PER_WEEK, origin),
        Period::Yday => distance_yday(x, every, origin),
        Period::Hour => distance_clock(x, every, origin, SECS_PER_HOUR, HOURS_PER_DAY),
        Period::Minute => distance_clock(x, every, origin, SECS_PER_MINUTE, MINUTES_PER_DAY),
        Period::Second => distance_second(x, every, origin),
        Period::Millisecond => distance_millisecond(x, every, origin),
    }
}

fn validate_every(every: i32) -> Result<i64, Error> {
    if every <= 0 {
        return Err(Error::InvalidEvery(every));
    }
    Ok(every as i64)
}

fn validate_origin(origin: &TimeColumn) -> Result<(), Error> {
    if origin.len() != 1 {
        return Err(Error::OriginSize(origin.len()));
    }
    Ok(())
}

/// Shift offsets by the origin and divide by the group width.
fn bucketize<I>(offsets: I, origin_offset: i64, every: i64) -> Vec<f64>
where
    I: IntoIterator<Item = Option<i64>>,
{
    offsets
        .into_iter()
        .map(|slot| match slot {
            None => f64::NAN,
            Some(units) => {
                let shifted = units - origin_offset;
                let bucket = if every == 1 {
                    shifted
                } else {
                    floor_div(shifted, every)
                };
                bucket as f64
            }
        })
        .collect()
}

fn distance_year(x: &TimeColumn, every: i64, origin: &TimeColumn) -> Result<Vec<f64>, Error> {
    let origin_offset = origin_year_offset(origin)? as i64;
    let offsets = year_offsets(x).into_iter().map(|s| s.map(i64::from));
    Ok(bucketize(offsets, origin_offset, every))
}

fn distance_month(x: &TimeColumn, every: i64, origin: &TimeColumn) -> Result<Vec<f64>, Error> {
    let origin_offset = origin_month_offset(origin)? as i64;
    let offsets = month_offsets(x).into_iter().map(|s| s.map(i64::from));
    Ok(bucketize(offsets, origin_offset, every))
}

fn distance_day(x: &TimeColumn, every: i64, origin: &TimeColumn) -> Result<Vec<f64>, Error> {
    let origin_offset = origin_days(origin)?;
    Ok(bucketize(day_offsets(x), origin_offset, every))
}

/// Hour and minute buckets: dates scale their day count by the units per
/// day; instants subtract the origin's seconds first, then divide by the
/// seconds per unit, so buckets align to the origin's clock rather than to
/// whole units since the epoch.
fn distance_clock(
    x: &TimeColumn,
    every: i64,
    origin: &TimeColumn,
    secs_per_unit: i64,
    units_per_day: i64,
) -> Result<Vec<f64>, Error> {
    if let TimeColumn::Date(_) = x {
        let origin_offset = origin_days(origin)?;
        let units = day_offsets(x)
            .into_iter()
            .map(|slot| slot.map(|d| (d - origin_offset) * units_per_day));
        return Ok(bucketize(units, 0, every));
    }

    let origin_offset = origin_seconds(origin)?;
    let units = instant_seconds(x)
        .into_iter()
        .map(|slot| slot.map(|s| floor_div(s - origin_offset, secs_per_unit)));
    Ok(bucketize(units, 0, every))
}

fn distance_second(x: &TimeColumn, every: i64, origin: &TimeColumn) -> Result<Vec<f64>, Error> {
    if let TimeColumn::Date(_) = x {
        let origin_offset = origin_days(origin)?;
        let units = day_offsets(x)
            .into_iter()
            .map(|slot| slot.map(|d| (d - origin_offset) * SECS_PER_DAY));
        return Ok(bucketize(units, 0, every));
    }

    let origin_offset = origin_seconds(origin)?;
    Ok(bucketize(instant_seconds(x), origin_offset, every))
}

fn distance_millisecond(
    x: &TimeColumn,
    every: i64,
    origin: &TimeColumn,
) -> Result<Vec<f64>, Error> {
    if let TimeColumn::Date(_) = x {
        let origin_offset = origin_days(origin)?;
        let units = day_offsets(x)
            .into_iter()
            .map(|slot| slot.map(|d| (d - origin_offset) * MILLIS_PER_DAY));
        return Ok(bucketize(units, 0, every));
    }

    let origin_offset = origin_milliseconds(origin)?;
    Ok(bucketize(instant_milliseconds(x), origin_offset, every))
}

// ----- year-aligned periods -----

fn distance_yday(x: &TimeColumn, every: i64, origin: &TimeColumn) -> Result<Vec<f64>, Error> {
    let (origin_year_offset, origin_yday) = origin_yday(origin)?;
    let origin_leap = is_leap_year(origin_year_offset + 1970);

    let units_in_leap_year = (DAYS_IN_LEAP_YEAR - 1) / every + 1;
    let units_in_non_leap_year = (DAYS_IN_YEAR - 1) / every + 1;

    Ok(yday_points(x)
        .into_iter()
        .map(|slot| match slot {
            None => f64::NAN,
            Some(point) => yday_bucket(
                point,
                origin_year_offset,
                origin_yday,
                origin_leap,
                units_in_leap_year,
                units_in_non_leap_year,
                every,
            ) as f64,
        })
        .collect())
}

/// Bucket index for one slot under a year-aligned period.
///
/// The origin's day-of-year starts bucket 0 of every year. A leap year
/// shifts all days-of-year from March 1 on by one relative to non-leap
/// years, so the origin day is adjusted whenever the slot's year and the
/// origin's year disagree on leapness; full years between the two origins
/// contribute a fixed unit count each, split by leapness.
fn yday_bucket(
    point: YdayPoint,
    origin_year_offset: i32,
    origin_yday: i32,
    origin_leap: bool,
    units_in_leap_year: i64,
    units_in_non_leap_year: i64,
    every: i64,
) -> i64 {
    let origin_yday_adjusted =
        origin_yday + leap_adjustment(point.year_offset, point.yday, origin_leap);

    let mut last_origin_year_offset = point.year_offset;
    if point.yday < origin_yday_adjusted {
        last_origin_year_offset -= 1;
    }

    let last_origin_day = days_before_year(last_origin_year_offset)
        + origin_yday as i64
        + leap_adjustment(last_origin_year_offset, origin_yday, origin_leap) as i64;

    let days_since_last_origin = point.days_since_epoch - last_origin_day;
    let units_in_year = floor_div(days_since_last_origin, every);

    let years_between = (last_origin_year_offset - origin_year_offset) as i64;
    let leap_years_between =
        leap_years_through(last_origin_year_offset) - leap_years_through(origin_year_offset);

    units_in_leap_year * leap_years_between
        + units_in_non_leap_year * (years_between - leap_years_between)
        + units_in_year
}

fn leap_adjustment(year_offset: i32, yday: i32, origin_leap: bool) -> i32 {
    // Days of year below 58 fall before any possible Feb 29 shift.
    if yday < 58 {
        return 0;
    }

    let year_leap = is_leap_year(year_offset + 1970);

    match (origin_leap, year_leap) {
        (true, false) => -1,
        (false, true) => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::days_of_date;
    use chrono::NaiveDate;

    fn date_col(dates: &[(i32, u32, u32)]) -> TimeColumn {
        TimeColumn::from_days(
            dates
                .iter()
                .map(|&(y, m, d)| {
                    Some(days_of_date(NaiveDate::from_ymd_opt(y, m, d).unwrap()) as i32)
                })
                .collect(),
        )
    }

    fn scalar_date(y: i32, m: u32, d: u32) -> TimeColumn {
        date_col(&[(y, m, d)])
    }

    #[test]
    fn yday_aligns_to_the_origin_day_of_year() {
        let origin = scalar_date(2019, 1, 1);
        let x = date_col(&[(2019, 1, 1), (2019, 1, 7), (2019, 1, 8), (2019, 12, 31)]);
        let got = distance(&x, Period::Yday, 7, Some(&origin)).unwrap();
        assert_eq!(got, vec![0.0, 0.0, 1.0, 52.0]);
    }

    #[test]
    fn yday_buckets_accumulate_across_years() {
        let origin = scalar_date(2019, 1, 1);
        // every=7 puts 53 units in both year shapes: (365-1)/7+1 == (366-1)/7+1.
        let x = date_col(&[(2020, 1, 1), (2021, 1, 1)]);
        let got = distance(&x, Period::Yday, 7, Some(&origin)).unwrap();
        assert_eq!(got, vec![53.0, 106.0]);
    }

    #[test]
    fn leap_and_non_leap_march_share_a_bucket_shape() {
        let origin = scalar_date(2019, 1, 1);
        // March 1: yday 59 in 2019, yday 60 in leap 2020; the +1 adjustment
        // cancels the shift so both land 59 days after their year's origin.
        let x = date_col(&[(2019, 3, 1), (2020, 3, 1)]);
        let got = distance(&x, Period::Yday, 7, Some(&origin)).unwrap();
        assert_eq!(got[0] + 53.0, got[1]);
        assert_eq!(got, vec![8.0, 61.0]);
    }

    #[test]
    fn leap_origin_shifts_back_in_non_leap_years() {
        // Origin on 2020-03-01 (leap year, yday 60).
        let origin = scalar_date(2020, 3, 1);
        let x = date_col(&[(2020, 3, 1), (2021, 3, 1), (2021, 2, 28)]);
        let got = distance(&x, Period::Yday, 1, Some(&origin)).unwrap();
        // 2021-03-01 has yday 59, adjusted origin 60 - 1 = 59: a fresh year.
        assert_eq!(got[0], 0.0);
        assert_eq!(got[1], 365.0);
        assert_eq!(got[2], 364.0);
    }

    #[test]
    fn yday_with_every_one_strides_by_year_shape() {
        let origin = scalar_date(2019, 1, 1);
        let x = date_col(&[(2019, 12, 31), (2020, 1, 1), (2020, 12, 31), (2021, 1, 1)]);
        let got = distance(&x, Period::Yday, 1, Some(&origin)).unwrap();
        // Each crossed year contributes its full unit count, split by
        // leapness of the arrival year; numbering restarts at the year line
        // rather than running on from the previous day.
        assert_eq!(got, vec![364.0, 366.0, 731.0, 731.0]);
    }

    #[test]
    fn january_is_identical_in_all_years() {
        let origin = scalar_date(2019, 2, 1);
        // Day-of-year below 58 never adjusts, leap year or not.
        let x = date_col(&[(2019, 1, 15), (2020, 1, 15), (2021, 1, 15)]);
        let got = distance(&x, Period::Yday, 7, Some(&origin)).unwrap();
        let in_year: Vec<f64> = got.iter().map(|b| b.rem_euclid(53.0)).collect();
        assert_eq!(in_year[0], in_year[1]);
        assert_eq!(in_year[1], in_year[2]);
    }

    #[test]
    fn every_must_be_positive() {
        let x = scalar_date(1970, 1, 1);
        assert_eq!(
            distance(&x, Period::Day, 0, None),
            Err(Error::InvalidEvery(0))
        );
        assert_eq!(
            distance(&x, Period::Day, -3, None),
            Err(Error::InvalidEvery(-3))
        );
    }

    #[test]
    fn origin_must_have_size_one() {
        let x = scalar_date(1970, 1, 1);
        let origin = date_col(&[(1970, 1, 1), (1970, 1, 2)]);
        assert_eq!(
            distance(&x, Period::Day, 1, Some(&origin)),
            Err(Error::OriginSize(2))
        );
    }

    #[test]
    fn missing_origin_value_is_an_error() {
        let x = scalar_date(1970, 1, 1);
        let origin = TimeColumn::from_days(vec![None]);
        assert_eq!(
            distance(&x, Period::Day, 1, Some(&origin)),
            Err(Error::OriginMissing)
        );
    }
}

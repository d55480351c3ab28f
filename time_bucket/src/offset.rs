//! Per-period offsets from the epoch.
//!
//! Each extractor maps a column to signed "units since 1970" counts in one
//! period's base unit, before origin subtraction and `every` division. Date
//! columns are decomposed with the pure day-count calendar; instants are
//! broken down in their zone; civil columns already carry their breakdown.

use chrono::Datelike;

use crate::calendar::{date_components, days_before_year};
use crate::column::{DateStorage, InstantStorage, TimeColumn, civil_of_instant, float_days};
use crate::divmod::floor_div;
use crate::error::Error;
use crate::guard::{guarded_floor, guarded_floor_to_millisecond};

const SECS_PER_DAY: i64 = 86_400;
const MILLIS_PER_SECOND: i64 = 1_000;
const MONTHS_PER_YEAR: i32 = 12;

/// Years since 1970 for every slot.
pub fn year_offsets(x: &TimeColumn) -> Vec<Option<i32>> {
    map_calendar(x, |c| c.year_offset, |civil| civil.year() - 1970)
}

/// Months since 1970-01 for every slot (`12 * year_offset + month`).
pub fn month_offsets(x: &TimeColumn) -> Vec<Option<i32>> {
    map_calendar(
        x,
        |c| c.year_offset * MONTHS_PER_YEAR + c.month,
        |civil| (civil.year() - 1970) * MONTHS_PER_YEAR + civil.month0() as i32,
    )
}

/// Days since 1970-01-01 for every slot.
///
/// Date columns yield their day count (floats floored); instants divide
/// their raw second count by 86,400 with floored division.
pub fn day_offsets(x: &TimeColumn) -> Vec<Option<i64>> {
    match x {
        TimeColumn::Date(DateStorage::Days(v)) => {
            v.iter().map(|slot| slot.map(|d| d as i64)).collect()
        }
        TimeColumn::Date(DateStorage::DaysFloat(v)) => {
            v.iter().map(|f| float_days(*f)).collect()
        }
        TimeColumn::Instant { .. } | TimeColumn::Civil { .. } => instant_seconds(x)
            .into_iter()
            .map(|slot| slot.map(|s| floor_div(s, SECS_PER_DAY)))
            .collect(),
    }
}

/// Calendar year and day-of-year of one slot, with its day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct YdayPoint {
    pub(crate) days_since_epoch: i64,
    pub(crate) year_offset: i32,
    pub(crate) yday: i32,
}

/// Year/day-of-year breakdown for every slot, for the year-aligned periods.
pub(crate) fn yday_points(x: &TimeColumn) -> Vec<Option<YdayPoint>> {
    match x {
        TimeColumn::Date(DateStorage::Days(v)) => v
            .iter()
            .map(|slot| slot.map(|d| yday_point_of_days(d as i64)))
            .collect(),
        TimeColumn::Date(DateStorage::DaysFloat(v)) => v
            .iter()
            .map(|f| float_days(*f).map(yday_point_of_days))
            .collect(),
        TimeColumn::Instant { storage, zone } => {
            let seconds = storage_seconds(storage);
            seconds
                .into_iter()
                .map(|slot| {
                    let civil = civil_of_instant(slot?, *zone)?;
                    Some(yday_point_of_civil(civil.date()))
                })
                .collect()
        }
        TimeColumn::Civil { values, .. } => values
            .iter()
            .map(|slot| slot.map(|v| yday_point_of_civil(v.date())))
            .collect(),
    }
}

/// Whole seconds since the epoch for instant-class slots.
///
/// Civil columns are widened to instants first; float storage goes through
/// the guarded floor. Must not be called on a date column.
pub(crate) fn instant_seconds(x: &TimeColumn) -> Vec<Option<i64>> {
    match x {
        TimeColumn::Date(_) => unreachable!("date columns take the day-count path"),
        TimeColumn::Instant { storage, .. } => storage_seconds(storage),
        TimeColumn::Civil { .. } => match x.as_datetime() {
            TimeColumn::Instant { storage, .. } => storage_seconds(&storage),
            _ => unreachable!("as_datetime returns an instant column"),
        },
    }
}

/// Whole milliseconds since the epoch for instant-class slots.
///
/// Float storage floors at the millisecond scale directly so the guard sits
/// on the right decimal place.
pub(crate) fn instant_milliseconds(x: &TimeColumn) -> Vec<Option<i64>> {
    match x {
        TimeColumn::Date(_) => unreachable!("date columns take the day-count path"),
        TimeColumn::Instant { storage, .. } => storage_milliseconds(storage),
        TimeColumn::Civil { .. } => match x.as_datetime() {
            TimeColumn::Instant { storage, .. } => storage_milliseconds(&storage),
            _ => unreachable!("as_datetime returns an instant column"),
        },
    }
}

// ----- origin resolution -----
//
// Origins arrive validated to length 1; a missing (or unrepresentable)
// origin value is an error rather than a missing output column.

pub(crate) fn origin_year_offset(origin: &TimeColumn) -> Result<i32, Error> {
    first(year_offsets(origin))
}

pub(crate) fn origin_month_offset(origin: &TimeColumn) -> Result<i32, Error> {
    first(month_offsets(origin))
}

/// Origin as a day count, via its local calendar date.
pub(crate) fn origin_days(origin: &TimeColumn) -> Result<i64, Error> {
    match origin.as_date() {
        TimeColumn::Date(DateStorage::Days(v)) => {
            first(v.into_iter().map(|d| d.map(|d| d as i64)).collect())
        }
        _ => unreachable!("as_date returns a date column"),
    }
}

/// Origin as whole epoch seconds, via the guarded floor for float storage.
pub(crate) fn origin_seconds(origin: &TimeColumn) -> Result<i64, Error> {
    match origin.as_datetime() {
        TimeColumn::Instant { storage, .. } => first(storage_seconds(&storage)),
        _ => unreachable!("as_datetime returns an instant column"),
    }
}

/// Origin as whole epoch milliseconds.
pub(crate) fn origin_milliseconds(origin: &TimeColumn) -> Result<i64, Error> {
    match origin.as_datetime() {
        TimeColumn::Instant { storage, .. } => first(storage_milliseconds(&storage)),
        _ => unreachable!("as_datetime returns an instant column"),
    }
}

/// Origin year and day-of-year for the year-aligned periods.
pub(crate) fn origin_yday(origin: &TimeColumn) -> Result<(i32, i32), Error> {
    first(yday_points(origin)).map(|p| (p.year_offset, p.yday))
}

// ----- internals -----

fn first<T>(values: Vec<Option<T>>) -> Result<T, Error> {
    values
        .into_iter()
        .next()
        .flatten()
        .ok_or(Error::OriginMissing)
}

fn storage_seconds(storage: &InstantStorage) -> Vec<Option<i64>> {
    match storage {
        InstantStorage::Seconds(v) => v.clone(),
        InstantStorage::SecondsFloat(v) => v
            .iter()
            .map(|f| f.is_finite().then(|| guarded_floor(*f)))
            .collect(),
    }
}

fn storage_milliseconds(storage: &InstantStorage) -> Vec<Option<i64>> {
    match storage {
        InstantStorage::Seconds(v) => v
            .iter()
            .map(|slot| slot.map(|s| s * MILLIS_PER_SECOND))
            .collect(),
        InstantStorage::SecondsFloat(v) => v
            .iter()
            .map(|f| f.is_finite().then(|| guarded_floor_to_millisecond(*f)))
            .collect(),
    }
}

fn yday_point_of_days(days: i64) -> YdayPoint {
    let c = date_components(days);
    YdayPoint {
        days_since_epoch: days,
        year_offset: c.year_offset,
        yday: c.yday,
    }
}

fn yday_point_of_civil(date: chrono::NaiveDate) -> YdayPoint {
    let year_offset = date.year() - 1970;
    let yday = date.ordinal0() as i32;
    YdayPoint {
        days_since_epoch: days_before_year(year_offset) + yday as i64,
        year_offset,
        yday,
    }
}

/// Shared per-slot calendar mapping over the three classes.
fn map_calendar<F, G>(x: &TimeColumn, from_components: F, from_civil: G) -> Vec<Option<i32>>
where
    F: Fn(crate::calendar::DateComponents) -> i32,
    G: Fn(chrono::NaiveDateTime) -> i32,
{
    match x {
        TimeColumn::Date(DateStorage::Days(v)) => v
            .iter()
            .map(|slot| slot.map(|d| from_components(date_components(d as i64))))
            .collect(),
        TimeColumn::Date(DateStorage::DaysFloat(v)) => v
            .iter()
            .map(|f| float_days(*f).map(|d| from_components(date_components(d))))
            .collect(),
        TimeColumn::Instant { storage, zone } => storage_seconds(storage)
            .into_iter()
            .map(|slot| {
                let civil = civil_of_instant(slot?, *zone)?;
                Some(from_civil(civil))
            })
            .collect(),
        TimeColumn::Civil { values, .. } => values
            .iter()
            .map(|slot| slot.map(&from_civil))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{days_of_date, parse_zone};
    use chrono::{NaiveDate, NaiveDateTime};

    fn days(y: i32, m: u32, d: u32) -> i32 {
        days_of_date(NaiveDate::from_ymd_opt(y, m, d).unwrap()) as i32
    }

    fn civil(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn year_and_month_offsets_from_dates() {
        let col = TimeColumn::from_days(vec![
            Some(days(1970, 1, 15)),
            Some(days(1971, 2, 1)),
            Some(days(1969, 12, 31)),
            None,
        ]);
        assert_eq!(
            year_offsets(&col),
            vec![Some(0), Some(1), Some(-1), None]
        );
        assert_eq!(
            month_offsets(&col),
            vec![Some(0), Some(13), Some(-1), None]
        );
    }

    #[test]
    fn offsets_respect_the_instant_zone() {
        // 1970-01-01T02:00:00Z reads as 1969-12-31 21:00 in New York.
        let ny = parse_zone("America/New_York").unwrap();
        let col = TimeColumn::from_seconds(vec![Some(7_200)], Some(ny));
        assert_eq!(year_offsets(&col), vec![Some(-1)]);
        assert_eq!(month_offsets(&col), vec![Some(-1)]);
        // Day offsets stay on raw seconds, not the local date.
        assert_eq!(day_offsets(&col), vec![Some(0)]);
    }

    #[test]
    fn day_offsets_floor_instants() {
        let col = TimeColumn::from_seconds(vec![Some(-1), Some(0), Some(86_400)], None);
        assert_eq!(day_offsets(&col), vec![Some(-1), Some(0), Some(1)]);
    }

    #[test]
    fn civil_columns_use_their_own_breakdown() {
        let col = TimeColumn::from_civil(vec![Some(civil(2019, 3, 1, 23))], None);
        assert_eq!(year_offsets(&col), vec![Some(49)]);
        let points = yday_points(&col);
        let p = points[0].unwrap();
        assert_eq!(p.year_offset, 49);
        assert_eq!(p.yday, 59);
        assert_eq!(p.days_since_epoch, days(2019, 3, 1) as i64);
    }

    #[test]
    fn origin_resolution_rejects_missing() {
        let missing = TimeColumn::from_days(vec![None]);
        assert_eq!(origin_days(&missing), Err(Error::OriginMissing));
        assert_eq!(origin_year_offset(&missing), Err(Error::OriginMissing));

        let present = TimeColumn::from_days(vec![Some(3)]);
        assert_eq!(origin_days(&present), Ok(3));
        assert_eq!(origin_seconds(&present), Ok(3 * 86_400));
        assert_eq!(origin_milliseconds(&present), Ok(3 * 86_400_000));
    }

    #[test]
    fn origin_seconds_guard_float_storage() {
        let origin = TimeColumn::from_seconds_f64(vec![-0.002000000000002444], None);
        assert_eq!(origin_seconds(&origin), Ok(-1));
        assert_eq!(origin_milliseconds(&origin), Ok(-2));
    }
}

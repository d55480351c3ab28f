#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use time_bucket::column::TimeColumn;

/// Day count since 1970-01-01 of a calendar date.
pub fn day(y: i32, m: u32, d: u32) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .signed_duration_since(epoch)
        .num_days() as i32
}

/// Epoch seconds of a UTC wall-clock datetime.
pub fn sec(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
    civil(y, m, d, h, mi, s).and_utc().timestamp()
}

pub fn civil(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

/// Integer-backed date column from calendar dates.
pub fn date_col(dates: &[(i32, u32, u32)]) -> TimeColumn {
    TimeColumn::from_days(dates.iter().map(|&(y, m, d)| Some(day(y, m, d))).collect())
}

/// Length-1 date column for use as an origin.
pub fn date_origin(y: i32, m: u32, d: u32) -> TimeColumn {
    date_col(&[(y, m, d)])
}

/// Integer-backed UTC instant column.
pub fn utc_seconds(values: &[i64]) -> TimeColumn {
    TimeColumn::from_seconds(values.iter().copied().map(Some).collect(), None)
}

/// Float-backed UTC instant column.
pub fn utc_seconds_f64(values: &[f64]) -> TimeColumn {
    TimeColumn::from_seconds_f64(values.to_vec(), None)
}

/// Slot-wise equality where two NaNs compare equal.
pub fn assert_distance_eq(got: &[f64], want: &[f64]) {
    assert_eq!(got.len(), want.len(), "length mismatch: {got:?} vs {want:?}");
    for (i, (g, w)) in got.iter().zip(want).enumerate() {
        let same = (g.is_nan() && w.is_nan()) || g == w;
        assert!(same, "slot {i}: got {g}, want {w} (full: {got:?} vs {want:?})");
    }
}

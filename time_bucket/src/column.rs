//! Timestamp columns and their calendar-class coercions.
//!
//! A [`TimeColumn`] holds one column of timestamps sharing a single calendar
//! interpretation, one of three classes:
//!
//! - [`TimeColumn::Date`]: whole days since 1970-01-01, integer or float
//!   backed.
//! - [`TimeColumn::Instant`]: seconds since the epoch, integer or float
//!   backed, with an optional IANA zone giving the wall-clock frame.
//! - [`TimeColumn::Civil`]: naive broken-down wall-clock values read in an
//!   optional IANA zone.
//!
//! Missing slots are `None` in integer storage and any non-finite value in
//! float storage. An absent zone means UTC; callers wanting local-time
//! semantics pass a zone explicitly.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::days_before_year;
use crate::error::Error;
use crate::guard::guarded_floor;

/// Seconds in one day, used when dates are widened to instants.
const SECS_PER_DAY: i64 = 86_400;

/// Calendar family of a [`TimeColumn`] (serde snake_case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeClass {
    /// Whole-day resolution.
    Date,
    /// Absolute instants.
    Instant,
    /// Broken-down wall-clock timestamps.
    Civil,
}

/// Storage for a date column.
#[derive(Debug, Clone, PartialEq)]
pub enum DateStorage {
    /// Integer day counts; `None` marks a missing slot.
    Days(Vec<Option<i32>>),
    /// Float day counts; non-finite values mark missing slots.
    DaysFloat(Vec<f64>),
}

/// Storage for an instant column.
#[derive(Debug, Clone, PartialEq)]
pub enum InstantStorage {
    /// Integer second counts; `None` marks a missing slot.
    Seconds(Vec<Option<i64>>),
    /// Float second counts; non-finite values mark missing slots.
    SecondsFloat(Vec<f64>),
}

/// A column of timestamps sharing one calendar interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeColumn {
    /// Calendar dates.
    Date(DateStorage),
    /// Absolute instants.
    Instant {
        /// Second counts since the epoch.
        storage: InstantStorage,
        /// Zone the instants are read in; `None` means UTC.
        zone: Option<Tz>,
    },
    /// Naive wall-clock timestamps.
    Civil {
        /// Broken-down values; `None` marks a missing slot.
        values: Vec<Option<NaiveDateTime>>,
        /// Zone the wall clock is read in; `None` means UTC.
        zone: Option<Tz>,
    },
}

impl TimeColumn {
    /// Date column from integer day counts since 1970-01-01.
    pub fn from_days(values: Vec<Option<i32>>) -> Self {
        TimeColumn::Date(DateStorage::Days(values))
    }

    /// Date column from float day counts since 1970-01-01.
    pub fn from_days_f64(values: Vec<f64>) -> Self {
        TimeColumn::Date(DateStorage::DaysFloat(values))
    }

    /// Date column from civil dates.
    pub fn from_dates(values: Vec<Option<NaiveDate>>) -> Self {
        let days = values
            .into_iter()
            .map(|slot| slot.map(|d| days_of_date(d) as i32))
            .collect();
        TimeColumn::Date(DateStorage::Days(days))
    }

    /// Instant column from integer second counts since the epoch.
    pub fn from_seconds(values: Vec<Option<i64>>, zone: Option<Tz>) -> Self {
        TimeColumn::Instant {
            storage: InstantStorage::Seconds(values),
            zone,
        }
    }

    /// Instant column from float second counts since the epoch.
    pub fn from_seconds_f64(values: Vec<f64>, zone: Option<Tz>) -> Self {
        TimeColumn::Instant {
            storage: InstantStorage::SecondsFloat(values),
            zone,
        }
    }

    /// Civil column from broken-down wall-clock values.
    pub fn from_civil(values: Vec<Option<NaiveDateTime>>, zone: Option<Tz>) -> Self {
        TimeColumn::Civil { values, zone }
    }

    /// Number of slots in the column, missing ones included.
    pub fn len(&self) -> usize {
        match self {
            TimeColumn::Date(DateStorage::Days(v)) => v.len(),
            TimeColumn::Date(DateStorage::DaysFloat(v)) => v.len(),
            TimeColumn::Instant {
                storage: InstantStorage::Seconds(v),
                ..
            } => v.len(),
            TimeColumn::Instant {
                storage: InstantStorage::SecondsFloat(v),
                ..
            } => v.len(),
            TimeColumn::Civil { values, .. } => values.len(),
        }
    }

    /// Whether the column has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calendar family of the column.
    pub fn class(&self) -> TimeClass {
        match self {
            TimeColumn::Date(_) => TimeClass::Date,
            TimeColumn::Instant { .. } => TimeClass::Instant,
            TimeColumn::Civil { .. } => TimeClass::Civil,
        }
    }

    /// Zone metadata; `None` for dates and for UTC-interpreted columns.
    pub fn time_zone(&self) -> Option<Tz> {
        match self {
            TimeColumn::Date(_) => None,
            TimeColumn::Instant { zone, .. } => *zone,
            TimeColumn::Civil { zone, .. } => *zone,
        }
    }

    /// Re-read the column in another zone.
    ///
    /// Instants keep their second counts and only change the wall-clock
    /// frame; civil values are projected through their current zone onto the
    /// new one (same instant, new wall clock); dates are zone-free and come
    /// back unchanged.
    pub fn convert_time_zone(&self, zone: Option<Tz>) -> TimeColumn {
        match self {
            TimeColumn::Date(storage) => TimeColumn::Date(storage.clone()),
            TimeColumn::Instant { storage, .. } => TimeColumn::Instant {
                storage: storage.clone(),
                zone,
            },
            TimeColumn::Civil {
                values,
                zone: from_zone,
            } => {
                let projected = values
                    .iter()
                    .map(|slot| {
                        let value = (*slot)?;
                        let (secs, nanos) = instant_of_civil(value, *from_zone)?;
                        civil_of_instant_nanos(secs, nanos, zone)
                    })
                    .collect();
                TimeColumn::Civil {
                    values: projected,
                    zone,
                }
            }
        }
    }

    /// Coerce to a date column, truncating sub-day information toward
    /// negative infinity.
    pub fn as_date(&self) -> TimeColumn {
        let days = match self {
            TimeColumn::Date(DateStorage::Days(v)) => v.clone(),
            TimeColumn::Date(DateStorage::DaysFloat(v)) => {
                v.iter().map(|f| float_days(*f).map(|d| d as i32)).collect()
            }
            TimeColumn::Instant { storage, zone } => match storage {
                InstantStorage::Seconds(v) => v
                    .iter()
                    .map(|slot| local_date_days((*slot)?, *zone))
                    .collect(),
                InstantStorage::SecondsFloat(v) => v
                    .iter()
                    .map(|f| {
                        if !f.is_finite() {
                            return None;
                        }
                        local_date_days(guarded_floor(*f), *zone)
                    })
                    .collect(),
            },
            TimeColumn::Civil { values, .. } => values
                .iter()
                .map(|slot| slot.map(|v| days_of_date(v.date()) as i32))
                .collect(),
        };
        TimeColumn::Date(DateStorage::Days(days))
    }

    /// Coerce to an instant column in the original zone.
    ///
    /// Dates become midnight UTC of that day. Civil values resolve DST
    /// ambiguity to the earliest instant; wall times that fall in a DST gap
    /// become missing.
    pub fn as_datetime(&self) -> TimeColumn {
        match self {
            TimeColumn::Date(DateStorage::Days(v)) => TimeColumn::Instant {
                storage: InstantStorage::Seconds(
                    v.iter()
                        .map(|slot| slot.map(|d| d as i64 * SECS_PER_DAY))
                        .collect(),
                ),
                zone: None,
            },
            TimeColumn::Date(DateStorage::DaysFloat(v)) => TimeColumn::Instant {
                storage: InstantStorage::SecondsFloat(
                    v.iter().map(|f| f * SECS_PER_DAY as f64).collect(),
                ),
                zone: None,
            },
            TimeColumn::Instant { storage, zone } => TimeColumn::Instant {
                storage: storage.clone(),
                zone: *zone,
            },
            TimeColumn::Civil { values, zone } => {
                let seconds = values
                    .iter()
                    .map(|slot| match slot.and_then(|v| instant_of_civil(v, *zone)) {
                        Some((secs, nanos)) => secs as f64 + nanos as f64 * 1e-9,
                        None => f64::NAN,
                    })
                    .collect();
                TimeColumn::Instant {
                    storage: InstantStorage::SecondsFloat(seconds),
                    zone: *zone,
                }
            }
        }
    }

    /// The instant whose wall clock reads 1970-01-01 00:00:00 in `zone`,
    /// used as the origin when none is given.
    pub(crate) fn epoch_origin(zone: Option<Tz>) -> TimeColumn {
        let seconds = match zone {
            None => 0,
            Some(tz) => tz
                .from_local_datetime(&epoch_civil())
                .earliest()
                .map(|dt| dt.timestamp())
                .unwrap_or(0),
        };
        TimeColumn::Instant {
            storage: InstantStorage::Seconds(vec![Some(seconds)]),
            zone,
        }
    }
}

/// Parse an IANA zone name (e.g. "America/New_York").
pub fn parse_zone(name: &str) -> Result<Tz, Error> {
    name.parse()
        .map_err(|_| Error::UnknownTimeZone(name.to_string()))
}

/// Day count since 1970-01-01 of a civil date.
pub(crate) fn days_of_date(date: NaiveDate) -> i64 {
    days_before_year(date.year() - 1970) + date.ordinal0() as i64
}

/// Floor a float day count, rejecting non-finite and out-of-range values.
pub(crate) fn float_days(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let days = value.floor();
    if days < i32::MIN as f64 || days > i32::MAX as f64 {
        return None;
    }
    Some(days as i64)
}

/// Wall-clock breakdown of an instant in a zone.
pub(crate) fn civil_of_instant(seconds: i64, zone: Option<Tz>) -> Option<NaiveDateTime> {
    civil_of_instant_nanos(seconds, 0, zone)
}

fn civil_of_instant_nanos(seconds: i64, nanos: u32, zone: Option<Tz>) -> Option<NaiveDateTime> {
    let utc = DateTime::from_timestamp(seconds, nanos)?;
    Some(match zone {
        Some(tz) => utc.with_timezone(&tz).naive_local(),
        None => utc.naive_utc(),
    })
}

/// Absolute position of a wall-clock value read in a zone, as floored epoch
/// seconds plus the sub-second nanoseconds.
///
/// Ambiguous wall times (DST fall-back) resolve to the earliest instant;
/// nonexistent ones (DST spring-forward gap) yield `None`.
pub(crate) fn instant_of_civil(value: NaiveDateTime, zone: Option<Tz>) -> Option<(i64, u32)> {
    let dt = match zone {
        Some(tz) => tz.from_local_datetime(&value).earliest()?.with_timezone(&chrono::Utc),
        None => value.and_utc(),
    };
    Some((dt.timestamp(), dt.timestamp_subsec_nanos()))
}

/// Local calendar date of an instant, as a day count.
fn local_date_days(seconds: i64, zone: Option<Tz>) -> Option<i32> {
    let civil = civil_of_instant(seconds, zone)?;
    Some(days_of_date(civil.date()) as i32)
}

fn epoch_civil() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .expect("epoch date")
        .and_hms_opt(0, 0, 0)
        .expect("epoch midnight")
}

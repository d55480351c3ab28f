//! Period kinds for bucketing timestamp columns.
//!
//! A [`Period`] names the base unit a bucket is measured in; the group
//! width `every` multiplies it at the operation call site (e.g. `Day` with
//! `every = 2` buckets by two-day groups). These types give a typed
//! alternative to ad-hoc strings when wiring the engine into schedulers or
//! query layers.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Base unit of a bucket (serde snake_case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Calendar year.
    Year,
    /// Calendar quarter (three months).
    Quarter,
    /// Calendar month.
    Month,
    /// Seven days, aligned to the origin day.
    Week,
    /// Seven days within each calendar year, leap-compensated.
    Yweek,
    /// Whole day.
    Day,
    /// Day within each calendar year, leap-compensated.
    Yday,
    /// Clock hour.
    Hour,
    /// Clock minute.
    Minute,
    /// Second.
    Second,
    /// Millisecond.
    Millisecond,
}

impl Period {
    /// Every period kind, in coarse-to-fine order.
    pub const ALL: [Period; 11] = [
        Period::Year,
        Period::Quarter,
        Period::Month,
        Period::Week,
        Period::Yweek,
        Period::Day,
        Period::Yday,
        Period::Hour,
        Period::Minute,
        Period::Second,
        Period::Millisecond,
    ];

    /// The lowercase name used by [`fmt::Display`] and [`FromStr`].
    pub const fn as_str(&self) -> &'static str {
        match self {
            Period::Year => "year",
            Period::Quarter => "quarter",
            Period::Month => "month",
            Period::Week => "week",
            Period::Yweek => "yweek",
            Period::Day => "day",
            Period::Yday => "yday",
            Period::Hour => "hour",
            Period::Minute => "minute",
            Period::Second => "second",
            Period::Millisecond => "millisecond",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(Period::Year),
            "quarter" => Ok(Period::Quarter),
            "month" => Ok(Period::Month),
            "week" => Ok(Period::Week),
            "yweek" => Ok(Period::Yweek),
            "day" => Ok(Period::Day),
            "yday" => Ok(Period::Yday),
            "hour" => Ok(Period::Hour),
            "minute" => Ok(Period::Minute),
            "second" => Ok(Period::Second),
            "millisecond" => Ok(Period::Millisecond),
            _ => Err(Error::UnknownPeriod(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_round_trip() {
        for period in Period::ALL {
            assert_eq!(period.to_string().parse::<Period>().unwrap(), period);
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert_eq!(
            "fortnight".parse::<Period>(),
            Err(Error::UnknownPeriod("fortnight".to_string()))
        );
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&Period::Yweek).unwrap(), "\"yweek\"");
        assert_eq!(
            serde_json::from_str::<Period>("\"millisecond\"").unwrap(),
            Period::Millisecond
        );
    }
}

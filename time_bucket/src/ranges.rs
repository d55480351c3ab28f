//! Contiguous run intervals over a bucketed column.

use serde::{Deserialize, Serialize};

use crate::change::changes;
use crate::column::TimeColumn;
use crate::error::Error;
use crate::period::Period;

/// Parallel `start`/`stop` columns of 1-based positions, one row per run of
/// equal bucket indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranges {
    /// First position of each run; `start[0]` is 1.
    pub start: Vec<usize>,
    /// Last position of each run; the final entry is the input length.
    pub stop: Vec<usize>,
}

impl Ranges {
    /// Build the interval table from a changes vector: each stop opens the
    /// next start at `stop + 1`.
    pub fn from_stops(stops: Vec<usize>) -> Self {
        let mut start = Vec::with_capacity(stops.len());
        if !stops.is_empty() {
            start.push(1);
            for stop in &stops[..stops.len() - 1] {
                start.push(stop + 1);
            }
        }
        Ranges { start, stop: stops }
    }

    /// Number of runs.
    pub fn len(&self) -> usize {
        self.stop.len()
    }

    /// Whether the table has no runs (empty input).
    pub fn is_empty(&self) -> bool {
        self.stop.is_empty()
    }
}

/// Bucket `x` and return the position intervals of runs sharing a bucket.
pub fn ranges(
    x: &TimeColumn,
    period: Period,
    every: i32,
    origin: Option<&TimeColumn>,
) -> Result<Ranges, Error> {
    Ok(Ranges::from_stops(changes(x, period, every, origin)?))
}

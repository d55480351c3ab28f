//! The unified error type for the `time_bucket` crate.
//!
//! Arguments are validated eagerly at entry to each public operation.
//! Per-slot anomalies (missing values, non-finite floats) are never errors;
//! they propagate through the output as missing.

use thiserror::Error;

/// Errors raised by argument validation and value construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// `every` was zero or negative.
    #[error("`every` must be an integer greater than 0, not {0}")]
    InvalidEvery(i32),

    /// `origin` did not contain exactly one element.
    #[error("`origin` must have size 1, not {0}")]
    OriginSize(usize),

    /// The single `origin` element was missing or not representable.
    #[error("`origin` must not be missing")]
    OriginMissing,

    /// A period name failed to parse.
    #[error("unknown period: {0}")]
    UnknownPeriod(String),

    /// An IANA time zone name failed to parse.
    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),
}

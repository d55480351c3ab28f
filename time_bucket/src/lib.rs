//! Period bucketing for timestamp columns.
//!
//! Given a column of timestamps, a period kind, a group width `every`, and
//! an optional origin, [`distance::distance`] assigns every slot the index
//! of the period bucket it falls in. [`change::changes`],
//! [`ranges::ranges`], and [`change::is_sorted`] derive group boundaries,
//! run intervals, and sortedness from the same arithmetic. All quotients are
//! floored, second counts are 64-bit, and float-backed seconds go through a
//! guarded conversion so binary representation noise cannot move a value
//! across a bucket edge.

#![deny(missing_docs)]

pub mod calendar;
pub mod change;
pub mod column;
pub mod distance;
pub mod divmod;
pub mod error;
pub mod guard;
pub mod offset;
pub mod period;
pub mod ranges;

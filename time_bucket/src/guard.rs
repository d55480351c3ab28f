//! Guarded conversion of float second counts to integer counts.
//!
//! Seconds since the epoch frequently arrive as `f64` whose low-order digits
//! are binary representation noise: `-0.002` is stored as
//! `-0.002000000000002444`, and a bare `floor()` after scaling to
//! milliseconds would land on -3 instead of -2. Only ~16 significant digits
//! of a `double` are stable, which for epoch-scale values (ten digits of
//! whole seconds) means microseconds. The conversion therefore truncates
//! everything past microseconds, adds a guard one decimal place smaller than
//! that, and floors. The guard cannot perturb inputs that are meaningfully
//! precise at the microsecond level.

/// Floor a float second count to whole seconds, guarding against
/// representation noise.
pub fn guarded_floor(value: f64) -> i64 {
    // Scale and trim past microseconds.
    let mut x = (value * 1e6).trunc() * 1e-6;

    // Add guard and floor.
    x += 1e-7;
    x.floor() as i64
}

/// Floor a float second count to whole milliseconds.
///
/// Same trim as [`guarded_floor`], but the guard is applied while the value
/// is still at the second scale so it sits on the right decimal place, and
/// only then is the value scaled to milliseconds and floored.
pub fn guarded_floor_to_millisecond(value: f64) -> i64 {
    // Scale and trim past microseconds.
    let mut x = (value * 1e6).trunc() * 1e-6;

    // Add guard, scale to milliseconds, and floor.
    x += 1e-7;
    x *= 1e3;
    x.floor() as i64
}

//! Ordinal view of `f64` values.
//!
//! Every non-NaN double maps to a signed integer ordinal that sorts exactly the way
//! IEEE `<` sorts the doubles themselves. Adjacent representable doubles have
//! adjacent ordinals, and `-0.0` shares ordinal `0` with `+0.0`.
//!
//! Sampling and shrinking both work in this space: a uniform draw over an ordinal
//! range is a uniform draw over the bit patterns inside a double interval, and
//! halving an ordinal distance converges on a target in at most 64 steps.

const SIGN_MASK: u64 = 1 << 63;

/// Ordinal of `+inf`. `-inf` is its negation.
pub const MAX_ORDINAL: i64 = 0x7FF0_0000_0000_0000;

/// Map a double to its ordinal.
///
/// NaN has no ordinal; callers must filter it out first.
pub fn to_ordinal(value: f64) -> i64 {
    debug_assert!(!value.is_nan(), "NaN has no ordinal");
    let bits = value.to_bits();
    let magnitude = (bits & !SIGN_MASK) as i64;
    if bits & SIGN_MASK == 0 {
        magnitude
    } else {
        -magnitude
    }
}

/// Map an ordinal in `[-MAX_ORDINAL, MAX_ORDINAL]` back to its double.
///
/// Ordinal `0` maps to `+0.0`.
pub fn from_ordinal(ordinal: i64) -> f64 {
    debug_assert!(
        (-MAX_ORDINAL..=MAX_ORDINAL).contains(&ordinal),
        "ordinal {ordinal} is outside the double range"
    );
    let magnitude = f64::from_bits(ordinal.unsigned_abs());
    if ordinal < 0 { -magnitude } else { magnitude }
}

/// Number of representable steps between two doubles.
pub fn ordinal_distance(a: f64, b: f64) -> u64 {
    (i128::from(to_ordinal(a)) - i128::from(to_ordinal(b))).unsigned_abs() as u64
}

/// Move `steps` ordinals away from `origin`, upward or downward.
///
/// The caller guarantees the destination stays inside the double range.
pub fn offset(origin: f64, steps: u64, upward: bool) -> f64 {
    let origin = i128::from(to_ordinal(origin));
    let steps = i128::from(steps);
    let destination = if upward { origin + steps } else { origin - steps };
    from_ordinal(destination as i64)
}

//! Validated inclusive `f64` intervals.
//!
//! An [`Interval`] is the only configuration a double generator carries. Its shape
//! is checked once, at construction, so generation and shrinking never fail.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::float_serde;

/// Smallest positive representable double (the first subnormal).
pub const SMALLEST_POSITIVE: f64 = f64::from_bits(1);

/// Smallest-magnitude negative representable double.
pub const SMALLEST_NEGATIVE: f64 = f64::from_bits(1 | (1 << 63));

/// Rejected interval configurations.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidIntervalError {
    /// One of the bounds is NaN.
    #[error("interval bound is NaN: [{min}, {max}]")]
    NanBound {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },
    /// The lower bound exceeds the upper bound.
    #[error("interval minimum {min} exceeds maximum {max}")]
    Inverted {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },
    /// Both bounds are the same infinity, leaving no representable values.
    #[error("interval [{min}, {max}] only spans a single infinity")]
    SameSignInfinities {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },
}

/// Inclusive range `[min, max]` of doubles. Infinite bounds mark unbounded sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IntervalBounds", into = "IntervalBounds")]
pub struct Interval {
    min: f64,
    max: f64,
}

impl Interval {
    /// Validate and build `[min_inclusive, max_inclusive]`.
    ///
    /// Single-point intervals are legal. NaN bounds, `min > max`, and a pair of
    /// identical infinities are rejected.
    pub fn new(min_inclusive: f64, max_inclusive: f64) -> Result<Self, InvalidIntervalError> {
        let (min, max) = (min_inclusive, max_inclusive);
        let rejection = if min.is_nan() || max.is_nan() {
            Some(InvalidIntervalError::NanBound { min, max })
        } else if min > max {
            Some(InvalidIntervalError::Inverted { min, max })
        } else if min.is_infinite() && min == max {
            Some(InvalidIntervalError::SameSignInfinities { min, max })
        } else {
            None
        };

        match rejection {
            Some(error) => {
                debug!(min, max, %error, "rejected double interval");
                Err(error)
            }
            None => Ok(Self { min, max }),
        }
    }

    /// `[-inf, +inf]`.
    pub const fn any() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    /// `[smallest positive, +inf]`: every positive double, zero excluded.
    pub const fn positive() -> Self {
        Self {
            min: SMALLEST_POSITIVE,
            max: f64::INFINITY,
        }
    }

    /// `[-inf, smallest-magnitude negative]`: every negative double, zero excluded.
    pub const fn negative() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: SMALLEST_NEGATIVE,
        }
    }

    /// `[0.0, 1.0]`.
    pub const fn from_zero_to_one() -> Self {
        Self { min: 0.0, max: 1.0 }
    }

    /// Inclusive lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Inclusive upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether `value` lies inside the interval. NaN never does.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Whether the interval holds exactly one value.
    pub fn is_point(&self) -> bool {
        self.min == self.max
    }

    /// The point shrinking converges on.
    ///
    /// Zero when the interval contains it, otherwise the bound with the smaller
    /// magnitude.
    pub fn shrink_target(&self) -> f64 {
        if self.contains(0.0) {
            0.0
        } else if self.min > 0.0 {
            self.min
        } else {
            self.max
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::any()
    }
}

/// Unvalidated wire form of an [`Interval`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct IntervalBounds {
    #[serde(with = "float_serde")]
    min: f64,
    #[serde(with = "float_serde")]
    max: f64,
}

impl TryFrom<IntervalBounds> for Interval {
    type Error = InvalidIntervalError;

    fn try_from(bounds: IntervalBounds) -> Result<Self, Self::Error> {
        Interval::new(bounds.min, bounds.max)
    }
}

impl From<Interval> for IntervalBounds {
    fn from(interval: Interval) -> Self {
        Self {
            min: interval.min,
            max: interval.max,
        }
    }
}

//! Shrinking of failing doubles toward an interval's shrink target.
//!
//! A [`ShrinkSequence`] is a plain value: iterating it twice yields the same
//! candidates. Each [`Shrinks`] iterator walks four stages and only emits a
//! candidate that is inside the interval, on the original value's side of the
//! target, and strictly closer to the target than everything emitted before it:
//!
//! 1. truncate the offset from the target to fewer significant decimal digits,
//! 2. halve the offset in real space a bounded number of times,
//! 3. halve the remaining ordinal distance,
//! 4. the target itself.
//!
//! Strictly decreasing distance rules out repeats, so every sequence terminates.

use tracing::trace;

use super::config::DoublesConfig;
use super::interval::Interval;
use super::ordinal::{offset, ordinal_distance, to_ordinal};

/// Restartable, finite sequence of shrink candidates for one failing value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShrinkSequence {
    value: f64,
    interval: Interval,
    config: DoublesConfig,
}

impl ShrinkSequence {
    /// Shrink `value`, which must have come from `interval`.
    ///
    /// A value outside the interval (or NaN) has nothing to shrink toward and
    /// yields an empty sequence.
    pub fn new(value: f64, interval: Interval, config: DoublesConfig) -> Self {
        trace!(
            value,
            target = interval.shrink_target(),
            min = interval.min(),
            max = interval.max(),
            "shrinking double"
        );
        Self {
            value,
            interval,
            config,
        }
    }

    /// The failing value being shrunk.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The point candidates converge on.
    pub fn target(&self) -> f64 {
        self.interval.shrink_target()
    }

    /// Start a fresh pass over the candidates.
    pub fn iter(&self) -> Shrinks {
        Shrinks::start(self)
    }

    /// Whether there is nothing left to shrink.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl IntoIterator for ShrinkSequence {
    type Item = f64;
    type IntoIter = Shrinks;

    fn into_iter(self) -> Shrinks {
        Shrinks::start(&self)
    }
}

impl IntoIterator for &ShrinkSequence {
    type Item = f64;
    type IntoIter = Shrinks;

    fn into_iter(self) -> Shrinks {
        Shrinks::start(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Truncate { digits: u32 },
    Bisect { remaining: u32 },
    Halve,
    Done,
}

/// Iterator over one pass of a [`ShrinkSequence`]. Holds only scalars.
#[derive(Debug, Clone)]
pub struct Shrinks {
    interval: Interval,
    target: f64,
    target_ordinal: i64,
    upward: bool,
    last: f64,
    last_distance: u64,
    max_bisections: u32,
    stage: Stage,
}

impl Shrinks {
    fn start(sequence: &ShrinkSequence) -> Self {
        let interval = sequence.interval;
        let target = interval.shrink_target();
        let value = sequence.value;
        let live = interval.contains(value) && ordinal_distance(value, target) > 0;

        let (upward, last_distance, stage) = if live {
            (
                to_ordinal(value) > to_ordinal(target),
                ordinal_distance(value, target),
                Stage::Truncate {
                    digits: sequence.config.truncate_digits(),
                },
            )
        } else {
            (false, 0, Stage::Done)
        };

        Self {
            interval,
            target,
            target_ordinal: to_ordinal(target),
            upward,
            last: value,
            last_distance,
            max_bisections: sequence.config.max_bisections(),
            stage,
        }
    }

    /// Accept `candidate` if it makes strict progress toward the target.
    fn admit(&mut self, candidate: f64) -> Option<f64> {
        if !self.interval.contains(candidate) {
            return None;
        }
        let ordinal = i128::from(to_ordinal(candidate));
        let delta = ordinal - i128::from(self.target_ordinal);
        let distance = delta.unsigned_abs() as u64;
        if distance >= self.last_distance || (delta != 0 && (delta > 0) != self.upward) {
            return None;
        }
        self.last = candidate;
        self.last_distance = distance;
        Some(candidate)
    }
}

impl Iterator for Shrinks {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        loop {
            if self.last_distance == 0 {
                self.stage = Stage::Done;
            }
            match self.stage {
                Stage::Done => return None,
                Stage::Truncate { digits: 0 } => {
                    self.stage = Stage::Bisect {
                        remaining: self.max_bisections,
                    };
                }
                Stage::Truncate { digits } => {
                    let offset = self.last - self.target;
                    // Only digit counts below the offset's shortest form remove anything.
                    let digits = digits.min(significant_digits(offset).saturating_sub(1));
                    if digits == 0 {
                        self.stage = Stage::Truncate { digits: 0 };
                        continue;
                    }
                    self.stage = Stage::Truncate { digits: digits - 1 };
                    let truncated = truncate_significant(offset, digits);
                    if let Some(candidate) = self.admit(self.target + truncated) {
                        return Some(candidate);
                    }
                }
                Stage::Bisect { remaining: 0 } => self.stage = Stage::Halve,
                Stage::Bisect { remaining } => {
                    self.stage = Stage::Bisect {
                        remaining: remaining - 1,
                    };
                    let halved = (self.last - self.target) / 2.0;
                    if let Some(candidate) = self.admit(self.target + halved) {
                        return Some(candidate);
                    }
                }
                Stage::Halve => {
                    let candidate = offset(self.target, self.last_distance / 2, self.upward);
                    // Ordinal halving always makes progress, ending on the target.
                    return self.admit(candidate);
                }
            }
        }
    }
}

/// Significant decimal digits in the shortest round-trip form of `offset`.
fn significant_digits(offset: f64) -> u32 {
    if offset == 0.0 || !offset.is_finite() {
        return 0;
    }
    let formatted = format!("{:e}", offset.abs());
    let mantissa = formatted.split('e').next().unwrap_or_default();
    mantissa.bytes().filter(u8::is_ascii_digit).count() as u32
}

/// Truncate `offset` toward zero, keeping `digits` significant decimal digits.
///
/// Works on the shortest decimal form, so the result is exact at every
/// magnitude: when digits are removed the result is strictly smaller in
/// magnitude, otherwise `offset` comes back unchanged.
fn truncate_significant(offset: f64, digits: u32) -> f64 {
    if digits == 0 || significant_digits(offset) <= digits {
        return offset;
    }
    let formatted = format!("{:e}", offset);
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return offset;
    };
    let sign = if offset.is_sign_negative() { "-" } else { "" };
    let kept: String = mantissa
        .chars()
        .filter(char::is_ascii_digit)
        .take(digits as usize)
        .collect();
    let (lead, rest) = kept.split_at(1);
    let decimal = if rest.is_empty() {
        format!("{sign}{lead}e{exponent}")
    } else {
        format!("{sign}{lead}.{rest}e{exponent}")
    };
    decimal.parse().unwrap_or(offset)
}

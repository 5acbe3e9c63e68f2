//! Representation-aware `f64` sampling inside an [`Interval`].
//!
//! A draw goes through at most two 64-bit words:
//!
//! 1. A selector. Its top bits occasionally force a special value (either bound or
//!    the shrink target) so edges and infinities show up often.
//! 2. A raw bit pattern. If it already encodes a double inside the interval it is
//!    used as-is; otherwise it is scaled onto the interval's ordinal range.
//!
//! Both paths sample over bit patterns rather than over the real line, which keeps
//! the dense region around zero and the far binades equally reachable.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::config::DoublesConfig;
use super::float_serde;
use super::interval::Interval;
use super::ordinal::{from_ordinal, ordinal_distance, to_ordinal};
use super::source::RandomSource;

/// Which branch of the sampler produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sampling {
    /// The interval's lower bound.
    LowerBound,
    /// The interval's upper bound.
    UpperBound,
    /// The interval's shrink target.
    Target,
    /// A raw bit pattern that already fell inside the interval.
    BitPattern,
    /// A raw bit pattern scaled onto the interval's ordinal range.
    Scaled,
}

/// A generated double plus the draw that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratedValue {
    #[serde(with = "float_serde")]
    value: f64,
    bits: u64,
    sampling: Sampling,
}

impl GeneratedValue {
    /// The generated double.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The last raw draw consumed: the selector for special values, the bit
    /// pattern otherwise.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Sampler branch used.
    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    /// Representable steps between the value and the interval's shrink target.
    pub fn distance_from_target(&self, interval: &Interval) -> u64 {
        ordinal_distance(self.value, interval.shrink_target())
    }
}

/// Produce one double inside `interval`.
///
/// Pure in its inputs: the same draws against the same interval and config always
/// give the same value. Never returns NaN.
pub fn generate<R>(interval: &Interval, source: &mut R, config: &DoublesConfig) -> GeneratedValue
where
    R: RandomSource + ?Sized,
{
    let selector = source.next_bits();
    let generated = if interval.is_point() {
        GeneratedValue {
            value: interval.min(),
            bits: selector,
            sampling: Sampling::LowerBound,
        }
    } else {
        match special_value(interval, selector, config) {
            Some((value, sampling)) => GeneratedValue {
                value,
                bits: selector,
                sampling,
            },
            None => sample(interval, source.next_bits()),
        }
    };

    trace!(
        min = interval.min(),
        max = interval.max(),
        value = generated.value,
        sampling = ?generated.sampling,
        "generated double"
    );
    generated
}

fn special_value(
    interval: &Interval,
    selector: u64,
    config: &DoublesConfig,
) -> Option<(f64, Sampling)> {
    let roll = selector >> (64 - config.special_value_bits());
    match roll {
        0 => Some((interval.min(), Sampling::LowerBound)),
        1 => Some((interval.max(), Sampling::UpperBound)),
        2 => Some((interval.shrink_target(), Sampling::Target)),
        _ => None,
    }
}

fn sample(interval: &Interval, raw: u64) -> GeneratedValue {
    let direct = f64::from_bits(raw);
    if interval.contains(direct) {
        return GeneratedValue {
            value: direct,
            bits: raw,
            sampling: Sampling::BitPattern,
        };
    }

    GeneratedValue {
        value: scale_onto(interval, raw),
        bits: raw,
        sampling: Sampling::Scaled,
    }
}

/// Map `raw` uniformly onto the ordinals between the interval's bounds.
fn scale_onto(interval: &Interval, raw: u64) -> f64 {
    let low = to_ordinal(interval.min());
    // At most 2 * MAX_ORDINAL, so `span + 1` cannot overflow.
    let span = ordinal_distance(interval.min(), interval.max());
    let step = (u128::from(raw) * (u128::from(span) + 1)) >> 64;
    from_ordinal((i128::from(low) + step as i128) as i64)
}

//! Laws every interval-bounded double generator must obey.
//!
//! Each helper panics with a descriptive message, so they work inside plain
//! `#[test]`s and `proptest!` blocks alike.

use crate::generators::composite::DoubleGen;
use crate::generators::interval::Interval;
use crate::generators::ordinal::ordinal_distance;
use crate::generators::source::ReplaySource;

/// Assert `value` lies inside `interval`.
pub fn assert_within_interval(value: f64, interval: &Interval) {
    assert!(
        interval.contains(value),
        "value {:?} outside interval [{:?}, {:?}]",
        value,
        interval.min(),
        interval.max()
    );
}

/// Assert every shrink candidate of `value` lies inside the generator's interval.
pub fn assert_shrink_within_interval(generator: &DoubleGen, value: f64) {
    let interval = generator.interval();
    for candidate in generator.shrink(value) {
        assert_within_interval(candidate, &interval);
    }
}

/// Assert shrink candidates never move away from the target and never repeat `value`.
pub fn assert_shrink_monotone(generator: &DoubleGen, value: f64) {
    let sequence = generator.shrink(value);
    let target = sequence.target();
    let mut previous = if value.is_nan() {
        u64::MAX
    } else {
        ordinal_distance(value, target)
    };
    for candidate in sequence {
        assert!(
            candidate.to_bits() != value.to_bits(),
            "shrinking {value:?} re-emitted the original value"
        );
        let distance = ordinal_distance(candidate, target);
        assert!(
            distance <= previous,
            "candidate {candidate:?} moved away from target {target:?}"
        );
        previous = distance;
    }
}

/// Assert shrinking `value` ends on the target, or is empty when already there.
pub fn assert_shrink_reaches_target(generator: &DoubleGen, value: f64) {
    let sequence = generator.shrink(value);
    let target = sequence.target();
    match sequence.into_iter().last() {
        Some(last) => assert_eq!(
            last, target,
            "shrinking {value:?} stopped at {last:?} instead of {target:?}"
        ),
        None => assert_eq!(
            value, target,
            "shrinking {value:?} produced nothing although the target is {target:?}"
        ),
    }
}

/// Assert two passes over the same shrink sequence agree.
pub fn assert_shrink_restartable(generator: &DoubleGen, value: f64) {
    let sequence = generator.shrink(value);
    let first: Vec<u64> = sequence.iter().map(f64::to_bits).collect();
    let second: Vec<u64> = sequence.iter().map(f64::to_bits).collect();
    assert_eq!(first, second, "shrink sequence for {value:?} is not restartable");
}

/// Assert the same draws always produce the same value.
pub fn assert_deterministic(generator: &DoubleGen, draws: &[u64]) {
    let first = generator.generate(&mut ReplaySource::new(draws.to_vec()));
    let second = generator.generate(&mut ReplaySource::new(draws.to_vec()));
    assert_eq!(
        first.value().to_bits(),
        second.value().to_bits(),
        "draws {draws:?} produced {:?} then {:?}",
        first.value(),
        second.value()
    );
}

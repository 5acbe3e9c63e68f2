//! The composite double generator: one interval, generation plus shrinking.
//!
//! [`DoubleGen`] is immutable and `Copy`; share it freely across threads. The
//! named constructors below are plain factories over [`Interval`].
//!
//! # Example
//!
//! ```rust
//! use kitchensink_doubles::generators::composite::{between, from};
//! use kitchensink_doubles::generators::source::SplitMix64;
//!
//! let unit = between(-1.0, 1.0).unwrap();
//! let value = unit.generate_value(&mut SplitMix64::new(7));
//! assert!((-1.0..=1.0).contains(&value));
//!
//! let teens = from(10.0).up_to_and_including(20.0).unwrap();
//! let shrunk: Vec<f64> = teens.shrink(17.3).into_iter().collect();
//! assert_eq!(shrunk.last(), Some(&10.0));
//! ```

use proptest::strategy::{NewTree, Strategy, ValueTree};
use proptest::test_runner::TestRunner;

use super::config::DoublesConfig;
use super::doubles::{self, GeneratedValue};
use super::interval::{Interval, InvalidIntervalError};
use super::ordinal::{from_ordinal, to_ordinal};
use super::shrink::{ShrinkSequence, Shrinks};
use super::source::RandomSource;

/// Generator and shrinker for doubles inside one [`Interval`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleGen {
    interval: Interval,
    config: DoublesConfig,
}

impl DoubleGen {
    /// Build a generator over an already validated interval.
    pub fn for_interval(interval: Interval) -> Self {
        Self {
            interval,
            config: DoublesConfig::default(),
        }
    }

    /// Replace the tuning configuration.
    pub fn with_config(mut self, config: DoublesConfig) -> Self {
        self.config = config;
        self
    }

    /// Interval this generator draws from.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Active configuration.
    pub fn config(&self) -> DoublesConfig {
        self.config
    }

    /// Draw one value, keeping its provenance.
    pub fn generate<R: RandomSource + ?Sized>(&self, source: &mut R) -> GeneratedValue {
        doubles::generate(&self.interval, source, &self.config)
    }

    /// Draw one value.
    pub fn generate_value<R: RandomSource + ?Sized>(&self, source: &mut R) -> f64 {
        self.generate(source).value()
    }

    /// Shrink candidates for a failing `value`.
    pub fn shrink(&self, value: f64) -> ShrinkSequence {
        ShrinkSequence::new(value, self.interval, self.config)
    }

    /// Shrink candidates for a failing generated value.
    pub fn shrink_generated(&self, generated: &GeneratedValue) -> ShrinkSequence {
        self.shrink(generated.value())
    }
}

/// Every double, infinities included.
pub fn any() -> DoubleGen {
    DoubleGen::for_interval(Interval::any())
}

/// Every positive double, from the smallest subnormal up to `+inf`.
pub fn positive() -> DoubleGen {
    DoubleGen::for_interval(Interval::positive())
}

/// Every negative double, from `-inf` up to the smallest-magnitude subnormal.
pub fn negative() -> DoubleGen {
    DoubleGen::for_interval(Interval::negative())
}

/// Doubles in `[0.0, 1.0]`.
pub fn from_zero_to_one() -> DoubleGen {
    DoubleGen::for_interval(Interval::from_zero_to_one())
}

/// Doubles in `[min_inclusive, max_inclusive]`.
pub fn between(min_inclusive: f64, max_inclusive: f64) -> Result<DoubleGen, InvalidIntervalError> {
    Interval::new(min_inclusive, max_inclusive).map(DoubleGen::for_interval)
}

/// Start a range whose upper bound is supplied later.
pub fn from(start_inclusive: f64) -> RangeStart {
    RangeStart { start_inclusive }
}

/// Pending lower bound of a two-step range.
///
/// Deliberately neither `Clone` nor `Copy`: it is consumed by
/// [`RangeStart::up_to_and_including`].
#[derive(Debug, PartialEq)]
#[must_use = "a range start produces nothing until its upper bound is supplied"]
pub struct RangeStart {
    start_inclusive: f64,
}

impl RangeStart {
    /// Close the range at `end_inclusive`.
    pub fn up_to_and_including(self, end_inclusive: f64) -> Result<DoubleGen, InvalidIntervalError> {
        between(self.start_inclusive, end_inclusive)
    }
}

impl Strategy for DoubleGen {
    type Tree = DoubleValueTree;
    type Value = f64;

    fn new_tree(&self, runner: &mut TestRunner) -> NewTree<Self> {
        let generated = self.generate(runner.rng());
        Ok(DoubleValueTree::new(*self, generated.value()))
    }
}

/// `proptest` value tree walking a [`DoubleGen`]'s shrink sequences.
///
/// Whenever the current candidate still fails, shrinking restarts from it.
/// Once a candidate passes, the tree binary-searches the ordinals between
/// that candidate and the last failure for the boundary counterexample.
#[derive(Debug, Clone)]
pub struct DoubleValueTree {
    generator: DoubleGen,
    current: f64,
    failing: f64,
    pending: Shrinks,
    rebase: bool,
    /// Lowest ordinal still untested on the way to `failing`, once a candidate passed.
    passing: Option<i64>,
}

impl DoubleValueTree {
    fn new(generator: DoubleGen, value: f64) -> Self {
        Self {
            generator,
            current: value,
            failing: value,
            pending: generator.shrink(value).into_iter(),
            rebase: false,
            passing: None,
        }
    }

    fn advance(&mut self) -> bool {
        match self.pending.next() {
            Some(candidate) => {
                self.current = candidate;
                self.rebase = true;
                true
            }
            None => {
                self.current = self.failing;
                self.rebase = false;
                false
            }
        }
    }

    fn reposition(&mut self, low: i64) -> bool {
        let high = to_ordinal(self.failing);
        self.passing = Some(low);
        if low == high {
            self.current = self.failing;
            self.rebase = false;
            return false;
        }
        let mid = i128::from(low) + (i128::from(high) - i128::from(low)) / 2;
        self.current = from_ordinal(mid as i64);
        self.rebase = true;
        true
    }
}

impl ValueTree for DoubleValueTree {
    type Value = f64;

    fn current(&self) -> f64 {
        self.current
    }

    fn simplify(&mut self) -> bool {
        let tried = self.rebase;
        if tried {
            self.failing = self.current;
        }
        match self.passing {
            Some(low) => self.reposition(low),
            None => {
                if tried {
                    self.pending = self.generator.shrink(self.failing).into_iter();
                }
                self.advance()
            }
        }
    }

    fn complicate(&mut self) -> bool {
        if !self.rebase {
            return false;
        }
        let passed = to_ordinal(self.current);
        let high = to_ordinal(self.failing);
        self.reposition(passed + (high - passed).signum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::source::{ReplaySource, SplitMix64};
    use proptest::test_runner::{Config, RngAlgorithm, TestCaseError, TestError, TestRng};

    #[test]
    fn named_constructors_select_expected_intervals() {
        assert_eq!(any().interval(), Interval::any());
        assert_eq!(positive().interval(), Interval::positive());
        assert_eq!(negative().interval(), Interval::negative());
        assert_eq!(from_zero_to_one().interval(), Interval::from_zero_to_one());
        assert_eq!(
            between(-1.0, 1.0).unwrap().interval(),
            Interval::new(-1.0, 1.0).unwrap()
        );
        assert_eq!(
            from(10.0).up_to_and_including(20.0).unwrap(),
            between(10.0, 20.0).unwrap()
        );
    }

    #[test]
    fn invalid_ranges_fail_at_construction() {
        assert_eq!(
            between(5.0, 2.0),
            Err(InvalidIntervalError::Inverted { min: 5.0, max: 2.0 })
        );
        assert!(from(5.0).up_to_and_including(2.0).is_err());
    }

    #[test]
    fn bit_pattern_scenario_generates_and_shrinks_inside_bounds() {
        let generator = between(-1.0, 1.0).unwrap();
        let mut source = ReplaySource::new(vec![u64::MAX, 0.875_f64.to_bits()]);
        let generated = generator.generate(&mut source);
        assert_eq!(generated.value(), 0.875);

        let shrunk: Vec<f64> = generator.shrink_generated(&generated).into_iter().collect();
        assert!(shrunk.contains(&0.0));
        assert!(shrunk.iter().all(|c| *c >= -1.0 && *c <= 1.0));
    }

    #[test]
    fn two_step_range_generates_and_shrinks_toward_lower_bound() {
        let generator = from(10.0).up_to_and_including(20.0).unwrap();
        let mut source = SplitMix64::new(99);
        for _ in 0..1_000 {
            let value = generator.generate_value(&mut source);
            assert!((10.0..=20.0).contains(&value), "{value}");
        }
        let shrunk: Vec<f64> = generator.shrink(17.3).into_iter().collect();
        assert!(!shrunk.contains(&17.3));
        assert_eq!(shrunk.last(), Some(&10.0));
    }

    #[test]
    fn equal_generators_behave_identically() {
        let first = between(-3.0, 8.0).unwrap();
        let second = from(-3.0).up_to_and_including(8.0).unwrap();
        let mut a = SplitMix64::new(1);
        let mut b = SplitMix64::new(1);
        for _ in 0..256 {
            assert_eq!(
                first.generate_value(&mut a).to_bits(),
                second.generate_value(&mut b).to_bits()
            );
        }
    }

    #[test]
    fn shared_generator_is_usable_across_threads() {
        let generator = any();
        let handles: Vec<_> = (0..4_u64)
            .map(|seed| {
                std::thread::spawn(move || {
                    let mut source = SplitMix64::new(seed);
                    (0..256)
                        .map(|_| generator.generate_value(&mut source).to_bits())
                        .collect::<Vec<u64>>()
                })
            })
            .collect();
        for (seed, handle) in handles.into_iter().enumerate() {
            let from_thread = handle.join().expect("worker should not panic");
            let mut source = SplitMix64::new(seed as u64);
            let local: Vec<u64> = (0..256)
                .map(|_| generator.generate_value(&mut source).to_bits())
                .collect();
            assert_eq!(from_thread, local);
        }
    }

    #[test]
    fn value_tree_restarts_from_each_failing_candidate() {
        let generator = between(0.0, 100.0).unwrap();
        let mut tree = DoubleValueTree::new(generator, 73.0);
        assert_eq!(tree.current(), 73.0);

        // 70 still fails, so the next candidate comes from shrinking 70.
        assert!(tree.simplify());
        assert_eq!(tree.current(), 70.0);
        assert!(tree.simplify());
        assert_eq!(tree.current(), 35.0);

        // 35 passes: search between it and the last failure.
        assert!(tree.complicate());
        let midpoint = tree.current();
        assert!(midpoint > 35.0 && midpoint < 70.0, "{midpoint}");

        // Failing midpoints tighten the upper end.
        assert!(tree.simplify());
        let tighter = tree.current();
        assert!(tighter > 35.0 && tighter < midpoint, "{tighter}");
    }

    #[test]
    fn value_tree_search_settles_on_smallest_failure() {
        let generator = between(0.0, 1_000.0).unwrap();
        let mut tree = DoubleValueTree::new(generator, 731.25);
        let fails = |v: f64| v >= 500.0;
        let mut more = tree.simplify();
        let mut steps = 0;
        while more {
            steps += 1;
            assert!(steps < 10_000);
            more = if fails(tree.current()) {
                tree.simplify()
            } else {
                tree.complicate()
            };
        }
        assert_eq!(tree.current(), 500.0);
    }

    #[test]
    fn value_tree_falls_back_to_last_failure_when_exhausted() {
        let generator = between(0.0, 1.0).unwrap();
        let mut tree = DoubleValueTree::new(generator, f64::from_bits(1));
        assert!(tree.simplify());
        assert_eq!(tree.current(), 0.0);
        assert!(!tree.complicate());
        assert_eq!(tree.current(), f64::from_bits(1));
        assert!(!tree.simplify());
    }

    #[test]
    fn proptest_runner_shrinks_to_a_boundary_counterexample() {
        let mut runner = TestRunner::new_with_rng(
            Config {
                cases: 2_048,
                failure_persistence: None,
                ..Config::default()
            },
            TestRng::deterministic_rng(RngAlgorithm::ChaCha),
        );
        let result = runner.run(&between(0.0, 1_000.0).unwrap(), |value| {
            if value >= 500.0 {
                Err(TestCaseError::fail("too large"))
            } else {
                Ok(())
            }
        });
        match result {
            Err(TestError::Fail(_, minimal)) => assert_eq!(minimal, 500.0),
            other => panic!("expected a failing case, got {other:?}"),
        }
    }

    #[test]
    fn proptest_runner_shrinks_unbounded_values_to_unit_magnitude() {
        for algorithm in [RngAlgorithm::ChaCha, RngAlgorithm::XorShift] {
            let mut runner = TestRunner::new_with_rng(
                Config {
                    cases: 256,
                    max_shrink_iters: 100_000,
                    failure_persistence: None,
                    ..Config::default()
                },
                TestRng::deterministic_rng(algorithm),
            );
            let result = runner.run(&any(), |value| {
                if value.abs() >= 1.0 {
                    Err(TestCaseError::fail("not a fraction"))
                } else {
                    Ok(())
                }
            });
            match result {
                Err(TestError::Fail(_, minimal)) => {
                    assert_eq!(minimal.abs(), 1.0, "{algorithm:?}: {minimal:e}")
                }
                other => panic!("expected a failing case, got {other:?}"),
            }
        }
    }
}

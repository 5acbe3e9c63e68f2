//! `proptest` strategies over intervals, for testing code that consumes [`DoubleGen`].

use proptest::prelude::*;

use super::composite::DoubleGen;
use super::interval::{Interval, SMALLEST_NEGATIVE, SMALLEST_POSITIVE};

/// Finite interval endpoints of either sign, subnormals and signed zeros included.
fn finite_bound() -> impl Strategy<Value = f64> {
    use prop::num::f64::{NEGATIVE, NORMAL, POSITIVE, SUBNORMAL, ZERO};
    POSITIVE | NEGATIVE | NORMAL | SUBNORMAL | ZERO
}

/// The named intervals plus a few degenerate shapes.
pub fn edge_intervals() -> impl Strategy<Value = Interval> {
    prop::sample::select(vec![
        (f64::NEG_INFINITY, f64::INFINITY),
        (SMALLEST_POSITIVE, f64::INFINITY),
        (f64::NEG_INFINITY, SMALLEST_NEGATIVE),
        (0.0, 1.0),
        (0.0, 0.0),
        (f64::MIN, f64::MAX),
        (f64::MAX, f64::INFINITY),
        (f64::NEG_INFINITY, f64::MIN),
    ])
    .prop_filter_map("edge interval", |(min, max)| Interval::new(min, max).ok())
}

/// Any valid interval: finite pairs, half-unbounded ranges, points, and edge shapes.
pub fn valid_interval() -> impl Strategy<Value = Interval> {
    prop_oneof![
        4 => (finite_bound(), finite_bound())
            .prop_filter_map("ordered finite bounds", |(a, b)| {
                Interval::new(a.min(b), a.max(b)).ok()
            }),
        1 => finite_bound().prop_filter_map("lower-bounded", |min| {
            Interval::new(min, f64::INFINITY).ok()
        }),
        1 => finite_bound().prop_filter_map("upper-bounded", |max| {
            Interval::new(f64::NEG_INFINITY, max).ok()
        }),
        1 => finite_bound().prop_filter_map("single point", |point| {
            Interval::new(point, point).ok()
        }),
        2 => edge_intervals(),
    ]
}

/// An interval paired with a value generated from it.
pub fn interval_with_value() -> impl Strategy<Value = (Interval, f64)> {
    valid_interval().prop_flat_map(|interval| (Just(interval), DoubleGen::for_interval(interval)))
}

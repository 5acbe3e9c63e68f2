//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used items from this crate. The
//! named constructors live under `double::` so they do not shadow
//! `proptest::prelude::any`.
//!
//! # Example
//!
//! ```rust,ignore
//! use kitchensink_doubles::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn halves_stay_in_range(v in double::between(-1.0, 1.0).unwrap()) {
//!         assert_within_interval(v / 2.0, &Interval::new(-1.0, 1.0).unwrap());
//!     }
//! }
//! ```

pub use proptest::prelude::*;

pub use crate::generators::composite::{self as double, DoubleGen, RangeStart};
pub use crate::generators::{
    DoublesConfig, GeneratedValue, InvalidIntervalError, Interval, RandomSource, ReplaySource,
    Sampling, ShrinkSequence, SplitMix64,
};
pub use crate::law::doubles::{
    assert_deterministic, assert_shrink_monotone, assert_shrink_reaches_target,
    assert_shrink_restartable, assert_shrink_within_interval, assert_within_interval,
};
pub use crate::replay::{ReplayError, ReplayRecord};

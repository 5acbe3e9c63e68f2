//! Interval-bounded `f64` generation and shrinking.

pub mod composite;
pub mod config;
pub mod doubles;
pub mod float_serde;
pub mod interval;
pub mod ordinal;
pub mod shrink;
pub mod source;
pub mod strategies;

pub use composite::{DoubleGen, DoubleValueTree, RangeStart};
pub use config::DoublesConfig;
pub use doubles::{GeneratedValue, Sampling};
pub use interval::{InvalidIntervalError, Interval};
pub use shrink::{ShrinkSequence, Shrinks};
pub use source::{RandomSource, RecordingSource, ReplaySource, SplitMix64};

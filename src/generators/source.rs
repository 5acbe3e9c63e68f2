//! Random bit sources consumed by the generator.
//!
//! Generation only ever asks for fixed-width 64-bit draws, so any PRNG (or a
//! recorded list of draws) can drive it.

use proptest::prelude::RngCore;
use proptest::test_runner::TestRng;

/// Supplier of unbiased 64-bit random draws.
pub trait RandomSource {
    /// Produce the next 64 random bits.
    fn next_bits(&mut self) -> u64;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_bits(&mut self) -> u64 {
        (**self).next_bits()
    }
}

impl RandomSource for TestRng {
    fn next_bits(&mut self) -> u64 {
        self.next_u64()
    }
}

/// Seedable splitmix64 source. Same seed, same draws, on every platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Create a source from a seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl RandomSource for SplitMix64 {
    fn next_bits(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

/// Replays a fixed list of draws, cycling when it runs out.
///
/// An empty list yields zero bits forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySource {
    draws: Vec<u64>,
    cursor: usize,
}

impl ReplaySource {
    /// Replay `draws` in order.
    pub fn new(draws: impl Into<Vec<u64>>) -> Self {
        Self {
            draws: draws.into(),
            cursor: 0,
        }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ReplaySource {
    fn next_bits(&mut self) -> u64 {
        if self.draws.is_empty() {
            return 0;
        }
        let draw = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        draw
    }
}

/// Wraps another source and keeps every draw it hands out.
#[derive(Debug)]
pub struct RecordingSource<S> {
    inner: S,
    draws: Vec<u64>,
}

impl<S: RandomSource> RecordingSource<S> {
    /// Start recording draws from `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            draws: Vec::new(),
        }
    }

    /// Draws recorded so far.
    pub fn draws(&self) -> &[u64] {
        &self.draws
    }

    /// Stop recording and return the draws.
    pub fn into_draws(self) -> Vec<u64> {
        self.draws
    }
}

impl<S: RandomSource> RandomSource for RecordingSource<S> {
    fn next_bits(&mut self) -> u64 {
        let draw = self.inner.next_bits();
        self.draws.push(draw);
        draw
    }
}

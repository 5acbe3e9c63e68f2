//! Tuning knobs for double generation and shrinking.

use serde::{Deserialize, Serialize};

/// Configuration shared by generation and shrinking.
///
/// Values are clamped on read, so a deserialized config can never push the
/// generator outside its supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoublesConfig {
    /// Width of the selector roll deciding whether a special value (a bound or
    /// the shrink target) is emitted. Each special value has probability
    /// `2^-bits`.
    special_value_bits: u32,
    /// Most significant decimal digits tried when truncating a shrink offset.
    truncate_digits: u32,
    /// Real-space halvings tried before falling back to ordinal halving.
    max_bisections: u32,
}

impl Default for DoublesConfig {
    fn default() -> Self {
        Self {
            special_value_bits: 5,
            truncate_digits: 15,
            max_bisections: 16,
        }
    }
}

impl DoublesConfig {
    /// Set the special-value selector width, clamped to `2..=16`.
    pub fn with_special_value_bits(mut self, bits: u32) -> Self {
        self.special_value_bits = bits;
        self
    }

    /// Set how many significant digits truncation starts from, clamped to `0..=17`.
    pub fn with_truncate_digits(mut self, digits: u32) -> Self {
        self.truncate_digits = digits;
        self
    }

    /// Set the real-space halving budget, clamped to `0..=64`.
    pub fn with_max_bisections(mut self, bisections: u32) -> Self {
        self.max_bisections = bisections;
        self
    }

    /// Effective selector width.
    pub fn special_value_bits(&self) -> u32 {
        self.special_value_bits.clamp(2, 16)
    }

    /// Effective truncation digit budget.
    pub fn truncate_digits(&self) -> u32 {
        self.truncate_digits.min(17)
    }

    /// Effective bisection budget.
    pub fn max_bisections(&self) -> u32 {
        self.max_bisections.min(64)
    }
}

//! Persisted generation records for replaying failing cases.
//!
//! A [`ReplayRecord`] stores the interval, configuration, and raw draws behind
//! one generated value. Feeding the draws back through the same generator must
//! reproduce the value bit for bit.
//!
//! # Example
//!
//! ```rust
//! use kitchensink_doubles::generators::composite::between;
//! use kitchensink_doubles::generators::source::SplitMix64;
//! use kitchensink_doubles::replay::ReplayRecord;
//!
//! let generator = between(-5.0, 5.0).unwrap();
//! let record = ReplayRecord::capture(&generator, &mut SplitMix64::new(3));
//! let json = record.to_json().unwrap();
//! let restored = ReplayRecord::from_json(&json).unwrap();
//! assert_eq!(restored.replay().unwrap().value(), record.value);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::generators::composite::DoubleGen;
use crate::generators::config::DoublesConfig;
use crate::generators::doubles::{GeneratedValue, Sampling};
use crate::generators::float_serde;
use crate::generators::interval::Interval;
use crate::generators::source::{RandomSource, RecordingSource, ReplaySource};

/// Replay failures.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The record carries no draws to replay.
    #[error("replay record has no recorded draws")]
    NoDraws,
    /// The draws no longer produce the recorded value.
    #[error("replayed value {replayed} does not match recorded value {recorded}")]
    Diverged {
        /// Value stored in the record.
        recorded: f64,
        /// Value produced by replaying the draws.
        replayed: f64,
    },
    /// JSON encoding or decoding failed, including invalid intervals.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Bincode encoding or decoding failed.
    #[cfg(feature = "serialization")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serialization")))]
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Everything needed to regenerate one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayRecord {
    /// Interval the value was drawn from.
    pub interval: Interval,
    /// Generator configuration at capture time.
    #[serde(default)]
    pub config: DoublesConfig,
    /// Raw draws consumed, in order.
    pub draws: Vec<u64>,
    /// The generated value.
    #[serde(with = "float_serde")]
    pub value: f64,
    /// Sampler branch that produced the value.
    pub sampling: Sampling,
}

impl ReplayRecord {
    /// Generate one value from `source` and record the draws behind it.
    pub fn capture<R: RandomSource + ?Sized>(generator: &DoubleGen, source: &mut R) -> Self {
        let mut recording = RecordingSource::new(source);
        let generated = generator.generate(&mut recording);
        Self {
            interval: generator.interval(),
            config: generator.config(),
            draws: recording.into_draws(),
            value: generated.value(),
            sampling: generated.sampling(),
        }
    }

    /// Generator matching the recorded interval and configuration.
    pub fn generator(&self) -> DoubleGen {
        DoubleGen::for_interval(self.interval).with_config(self.config)
    }

    /// Regenerate the value from the recorded draws and check it matches.
    pub fn replay(&self) -> Result<GeneratedValue, ReplayError> {
        if self.draws.is_empty() {
            return Err(ReplayError::NoDraws);
        }
        let mut source = ReplaySource::new(self.draws.clone());
        let generated = self.generator().generate(&mut source);
        if generated.value().to_bits() != self.value.to_bits() {
            debug!(
                recorded = self.value,
                replayed = generated.value(),
                "replay diverged"
            );
            return Err(ReplayError::Diverged {
                recorded: self.value,
                replayed: generated.value(),
            });
        }
        Ok(generated)
    }

    /// Pretty JSON encoding.
    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a JSON record. Invalid intervals are rejected here.
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compact binary encoding.
    #[cfg(feature = "serialization")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serialization")))]
    pub fn to_bincode(&self) -> Result<Vec<u8>, ReplayError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a binary record.
    #[cfg(feature = "serialization")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serialization")))]
    pub fn from_bincode(bytes: &[u8]) -> Result<Self, ReplayError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::composite::{any, between};
    use crate::generators::source::SplitMix64;

    #[test]
    fn captured_record_replays_exactly() {
        let generator = between(-10.0, 10.0).unwrap();
        let mut source = SplitMix64::new(21);
        for _ in 0..64 {
            let record = ReplayRecord::capture(&generator, &mut source);
            assert!(!record.draws.is_empty() && record.draws.len() <= 2);
            let replayed = record.replay().expect("replay should reproduce value");
            assert_eq!(replayed.value().to_bits(), record.value.to_bits());
            assert_eq!(replayed.sampling(), record.sampling);
        }
    }

    #[test]
    fn json_round_trip_keeps_infinite_bounds() {
        let record = ReplayRecord::capture(&any(), &mut SplitMix64::new(8));
        let json = record.to_json().expect("encode");
        assert!(json.contains("\"-inf\""));
        let decoded = ReplayRecord::from_json(&json).expect("decode");
        assert_eq!(decoded.interval, record.interval);
        assert_eq!(decoded.draws, record.draws);
        assert_eq!(decoded.value.to_bits(), record.value.to_bits());
        decoded.replay().expect("decoded record should replay");
    }

    #[test]
    fn tampered_records_are_rejected() {
        let generator = between(0.0, 1.0).unwrap();
        let mut record = ReplayRecord::capture(&generator, &mut SplitMix64::new(4));
        record.value = 2.0;
        assert!(matches!(record.replay(), Err(ReplayError::Diverged { .. })));

        record.draws.clear();
        assert!(matches!(record.replay(), Err(ReplayError::NoDraws)));

        let inverted = r#"{"interval":{"min":3.0,"max":1.0},"draws":[1],"value":2.0,"sampling":"scaled"}"#;
        assert!(matches!(
            ReplayRecord::from_json(inverted),
            Err(ReplayError::Json(_))
        ));
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn bincode_round_trip_replays() {
        let record = ReplayRecord::capture(&any(), &mut SplitMix64::new(12));
        let bytes = record.to_bincode().expect("encode");
        let decoded = ReplayRecord::from_bincode(&bytes).expect("decode");
        assert_eq!(decoded.draws, record.draws);
        decoded.replay().expect("decoded record should replay");
    }
}

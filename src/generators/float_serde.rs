//! Serde adapter for `f64` fields that may hold infinities.
//!
//! JSON has no literal for infinity, so human-readable formats write non-finite
//! values as the strings `"inf"`, `"-inf"` and `"NaN"`. Binary formats keep the
//! raw `f64`.

use std::fmt;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serializer};

/// Serialize a double, spelling non-finite values out in human-readable formats.
pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if serializer.is_human_readable() && !value.is_finite() {
        serializer.serialize_str(&value.to_string())
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Deserialize a double written by [`serialize`].
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    if deserializer.is_human_readable() {
        deserializer.deserialize_any(BoundVisitor)
    } else {
        f64::deserialize(deserializer)
    }
}

struct BoundVisitor;

impl Visitor<'_> for BoundVisitor {
    type Value = f64;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a number or one of \"inf\", \"-inf\", \"NaN\"")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
        Ok(value as f64)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
        Ok(value as f64)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
        value
            .parse::<f64>()
            .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Wrapped(#[serde(with = "super")] f64);

    #[test]
    fn json_spells_out_infinities() {
        assert_eq!(
            serde_json::to_string(&Wrapped(f64::INFINITY)).expect("serialize"),
            "\"inf\""
        );
        assert_eq!(
            serde_json::to_string(&Wrapped(f64::NEG_INFINITY)).expect("serialize"),
            "\"-inf\""
        );
        assert_eq!(serde_json::to_string(&Wrapped(1.5)).expect("serialize"), "1.5");
    }

    #[test]
    fn json_reads_numbers_and_names() {
        let parsed: Wrapped = serde_json::from_str("\"-inf\"").expect("deserialize");
        assert_eq!(parsed.0, f64::NEG_INFINITY);
        let parsed: Wrapped = serde_json::from_str("3").expect("deserialize");
        assert_eq!(parsed.0, 3.0);
        let parsed: Wrapped = serde_json::from_str("-2.25").expect("deserialize");
        assert_eq!(parsed.0, -2.25);
        assert!(serde_json::from_str::<Wrapped>("\"wide\"").is_err());
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn bincode_keeps_raw_doubles() {
        let bytes = bincode::serialize(&Wrapped(f64::INFINITY)).expect("serialize");
        let parsed: Wrapped = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(parsed.0, f64::INFINITY);
    }
}

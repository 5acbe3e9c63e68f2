//! # kitchensink-doubles
//!
//! `kitchensink-doubles` generates and shrinks `f64` test inputs inside an inclusive
//! interval. It is organized around:
//! - `generators`: interval validation, representation-aware sampling, shrinking,
//!   and the composite [`DoubleGen`](generators::DoubleGen) that plugs into `proptest`
//! - `law`: reusable assertions every interval-bounded generator must satisfy
//! - `replay`: persisted draw records for reproducing a failing case
//!
//! Randomness always comes from the caller through
//! [`RandomSource`](generators::RandomSource); generators hold no mutable state.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub mod generators;
pub mod law;
pub mod prelude;
pub mod replay;

/// Re-export `proptest` for convenience.
pub use proptest;

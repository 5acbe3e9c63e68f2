//! Law/invariant assertion helpers.

pub mod doubles;

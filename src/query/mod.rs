//! Spatial formulas and the selection queries built on them

/// Two-valued spatial formulas and their reversing composition
pub mod formula;
/// Randomized selection queries shared across a painting run
pub mod select;

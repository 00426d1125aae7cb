//! Projection of knot events onto summary statistics.

pub mod analyzer;

pub use analyzer::{analyze, harmony_score, RiemannStats, PRESCALE, TARGET, TARGET_RADIUS};

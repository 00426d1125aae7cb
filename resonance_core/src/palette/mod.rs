//! Dominant-color profiling and mood category activations.

pub mod category;
pub mod profiler;

pub use category::MoodCategory;
pub use profiler::{activations, extract_main_colors, MainColor, NEUTRAL_ACTIVATION};

//! Pixel transform and post-processing.

pub mod pixel;
pub mod post;

pub use pixel::{transform, HarmonyGrade, PixelTransformer, ToneAdjustment, WavePhase};
pub use post::{post_process, resize, PostEffect};

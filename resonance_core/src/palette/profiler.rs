//! Dominant color extraction.
//!
//! Roughly 2000 pixels are sampled at a fixed stride. Near-black and
//! near-white samples are rejected, the rest are quantised into 32-wide
//! channel bins and the most frequent bins become the image's main colors.

use std::collections::HashMap;

use resonance_shared::{PixelBuffer, RandomSource};
use serde::{Deserialize, Serialize};

use super::category::MoodCategory;

/// Approximate number of pixels inspected per image.
pub const SAMPLE_TARGET: usize = 2000;
/// Samples with `r + g + b` below this are treated as black.
pub const MIN_CHANNEL_SUM: u32 = 60;
/// Samples with `r + g + b` above this are treated as white.
pub const MAX_CHANNEL_SUM: u32 = 700;
const BIN_WIDTH: u8 = 32;
const PAD_MIN: f64 = 80.0;
const PAD_SPAN: f64 = 176.0;
/// Activation assumed for categories without a main color.
pub const NEUTRAL_ACTIVATION: f64 = 0.5;

/// A dominant color (bin center) with its activation level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MainColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Mean of the channels scaled into `[0, 1]`
    pub activation: f64,
}

impl MainColor {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let activation = (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0 / 255.0;
        Self { r, g, b, activation }
    }

    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Returns `count` main colors of `buffer`, most frequent first.
///
/// When fewer than `count` bins survive the filters the list is padded with
/// random colors whose channels lie in `[80, 255]`.
pub fn extract_main_colors<R: RandomSource + ?Sized>(
    buffer: &PixelBuffer,
    count: usize,
    rng: &mut R,
) -> Vec<MainColor> {
    let total = buffer.len();
    let stride = (total / SAMPLE_TARGET).max(1);
    let mut bins: HashMap<[u8; 3], usize> = HashMap::new();

    for pixel in buffer.pixels().step_by(stride) {
        let sum = u32::from(pixel[0]) + u32::from(pixel[1]) + u32::from(pixel[2]);
        if !(MIN_CHANNEL_SUM..=MAX_CHANNEL_SUM).contains(&sum) {
            continue;
        }
        let key = [bin_center(pixel[0]), bin_center(pixel[1]), bin_center(pixel[2])];
        *bins.entry(key).or_insert(0) += 1;
    }

    let mut ranked: Vec<([u8; 3], usize)> = bins.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let distinct = ranked.len();

    let mut colors: Vec<MainColor> = ranked
        .into_iter()
        .take(count)
        .map(|([r, g, b], _)| MainColor::from_rgb(r, g, b))
        .collect();
    while colors.len() < count {
        let r = padding_channel(rng.next_unit());
        let g = padding_channel(rng.next_unit());
        let b = padding_channel(rng.next_unit());
        colors.push(MainColor::from_rgb(r, g, b));
    }

    tracing::debug!(stride, distinct, requested = count, "extracted main colors");
    colors
}

/// Fixed-length activation vector, one entry per [`MoodCategory`].
///
/// Categories beyond the supplied colors stay at [`NEUTRAL_ACTIVATION`].
pub fn activations(colors: &[MainColor]) -> [f64; MoodCategory::COUNT] {
    let mut out = [NEUTRAL_ACTIVATION; MoodCategory::COUNT];
    for (slot, color) in out.iter_mut().zip(colors) {
        *slot = color.activation;
    }
    out
}

fn bin_center(channel: u8) -> u8 {
    channel / BIN_WIDTH * BIN_WIDTH + BIN_WIDTH / 2
}

fn padding_channel(unit: f64) -> u8 {
    (PAD_MIN + unit * PAD_SPAN).floor().min(255.0) as u8
}

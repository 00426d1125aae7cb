//! Resize and harmony-selected finishing pass.
//!
//! High harmony gets a mild contrast and saturation boost, low harmony a box
//! blur whose radius grows with `1 - harmony`, anything in between is only
//! resized.

use ndarray::{Array2, Zip};
use rayon::prelude::*;
use resonance_shared::{PixelBuffer, CHANNELS};

use crate::config::PostProcessConfig;
use crate::error::{ResonanceError, ResonanceResult};
use crate::resample::resample_grid;

/// Finishing effect chosen from the harmony score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PostEffect {
    Sharpen { boost: f64 },
    Blur { radius: usize },
    None,
}

impl PostEffect {
    pub fn select(harmony: f64, config: &PostProcessConfig) -> Self {
        if harmony > config.sharpen_threshold {
            PostEffect::Sharpen {
                boost: config.sharpen_boost,
            }
        } else if harmony < config.blur_threshold {
            let radius = ((1.0 - harmony.clamp(0.0, 1.0)) * config.blur_scale).round() as usize;
            match radius.min(config.max_blur_radius) {
                0 => PostEffect::None,
                radius => PostEffect::Blur { radius },
            }
        } else {
            PostEffect::None
        }
    }
}

/// Resizes `buffer` to `width x height` and applies the harmony-selected effect.
pub fn post_process(
    buffer: &PixelBuffer,
    harmony: f64,
    width: usize,
    height: usize,
    config: &PostProcessConfig,
) -> ResonanceResult<PixelBuffer> {
    let resized = resize(buffer, width, height)?;
    let effect = PostEffect::select(harmony, config);
    tracing::debug!(?effect, width, height, "post-processing");
    Ok(match effect {
        PostEffect::Sharpen { boost } => sharpen(&resized, boost),
        PostEffect::Blur { radius } => box_blur(&resized, radius)?,
        PostEffect::None => resized,
    })
}

/// Bilinear resize of all four channels.
pub fn resize(buffer: &PixelBuffer, width: usize, height: usize) -> ResonanceResult<PixelBuffer> {
    if (buffer.width(), buffer.height()) == (width, height) {
        return Ok(buffer.clone());
    }
    if buffer.is_empty() {
        return Err(ResonanceError::resource(
            "resize",
            "cannot resize an empty pixel buffer",
        ));
    }
    let planes = split_planes(buffer);
    let mut resized = Vec::with_capacity(CHANNELS);
    for plane in &planes {
        resized.push(resample_grid(plane, width, height)?);
    }
    Ok(merge_planes(&resized, width, height)?)
}

/// Mild contrast and saturation boost, alpha untouched.
pub fn sharpen(buffer: &PixelBuffer, boost: f64) -> PixelBuffer {
    let mut out = buffer.clone();
    out.data_mut().par_chunks_mut(CHANNELS).for_each(|pixel| {
        let rgb = [pixel[0], pixel[1], pixel[2]]
            .map(|byte| (f64::from(byte) / 255.0 - 0.5) * boost + 0.5);
        let luma = 0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2];
        for (channel, value) in pixel.iter_mut().zip(rgb) {
            *channel = to_byte(luma + (value - luma) * boost);
        }
    });
    out
}

/// Separable box blur of the color channels; alpha is copied through.
pub fn box_blur(buffer: &PixelBuffer, radius: usize) -> ResonanceResult<PixelBuffer> {
    if radius == 0 || buffer.is_empty() {
        return Ok(buffer.clone());
    }
    let mut planes = split_planes(buffer);
    for plane in planes.iter_mut().take(3) {
        let horizontal = blur_pass(plane, radius, true);
        *plane = blur_pass(&horizontal, radius, false);
    }
    Ok(merge_planes(&planes, buffer.width(), buffer.height())?)
}

fn blur_pass(plane: &Array2<f64>, radius: usize, horizontal: bool) -> Array2<f64> {
    let (rows, cols) = plane.dim();
    let mut out = Array2::zeros((rows, cols));
    Zip::indexed(&mut out).par_for_each(|(row, col), value| {
        let (center, len) = if horizontal { (col, cols) } else { (row, rows) };
        let start = center.saturating_sub(radius);
        let end = (center + radius).min(len - 1);
        let sum: f64 = (start..=end)
            .map(|i| if horizontal { plane[[row, i]] } else { plane[[i, col]] })
            .sum();
        *value = sum / (end - start + 1) as f64;
    });
    out
}

fn split_planes(buffer: &PixelBuffer) -> Vec<Array2<f64>> {
    let (width, height) = (buffer.width(), buffer.height());
    let data = buffer.data();
    (0..CHANNELS)
        .map(|channel| {
            Array2::from_shape_fn((height, width), |(y, x)| {
                f64::from(data[(y * width + x) * CHANNELS + channel])
            })
        })
        .collect()
}

fn merge_planes(
    planes: &[Array2<f64>],
    width: usize,
    height: usize,
) -> Result<PixelBuffer, resonance_shared::PixelError> {
    let mut data = vec![0u8; width * height * CHANNELS];
    data.par_chunks_mut(CHANNELS)
        .enumerate()
        .for_each(|(index, pixel)| {
            let (x, y) = (index % width, index / width);
            for (channel, plane) in pixel.iter_mut().zip(planes) {
                *channel = plane[[y, x]].round().clamp(0.0, 255.0) as u8;
            }
        });
    PixelBuffer::new(width, height, data)
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                [200, 60, 60, 255]
            } else {
                [60, 60, 200, 128]
            }
        })
    }

    #[test]
    fn selects_effect_by_harmony() {
        let config = PostProcessConfig::default();
        assert_eq!(
            PostEffect::select(0.9, &config),
            PostEffect::Sharpen { boost: 1.10 }
        );
        assert_eq!(PostEffect::select(0.5, &config), PostEffect::None);
        assert_eq!(PostEffect::select(0.75, &config), PostEffect::None);
        assert_eq!(PostEffect::select(0.0, &config), PostEffect::Blur { radius: 3 });
        assert_eq!(PostEffect::select(0.2, &config), PostEffect::Blur { radius: 2 });
    }

    #[test]
    fn blur_radius_is_capped() {
        let config = PostProcessConfig {
            blur_scale: 40.0,
            max_blur_radius: 5,
            ..PostProcessConfig::default()
        };
        assert_eq!(PostEffect::select(0.1, &config), PostEffect::Blur { radius: 5 });
    }

    #[test]
    fn resize_changes_dimensions() {
        let output = resize(&checker(6, 4), 12, 3).unwrap();
        assert_eq!((output.width(), output.height()), (12, 3));
        assert_eq!(output.data().len(), 12 * 3 * 4);
    }

    #[test]
    fn uniform_images_survive_resize_and_blur() {
        let flat = PixelBuffer::filled(5, 5, [90, 120, 150, 200]);
        let resized = resize(&flat, 9, 7).unwrap();
        assert!(resized.pixels().all(|px| px == [90, 120, 150, 200]));
        let blurred = box_blur(&resized, 2).unwrap();
        assert_eq!(blurred, resized);
    }

    #[test]
    fn blur_smooths_and_keeps_alpha() {
        let input = checker(8, 8);
        let blurred = box_blur(&input, 1).unwrap();
        for (src, dst) in input.pixels().zip(blurred.pixels()) {
            assert_eq!(src[3], dst[3]);
        }
        let center = blurred.pixel(4, 4);
        assert!(center[0] < 200 && center[0] > 60);
    }

    #[test]
    fn sharpen_spreads_channels_apart() {
        let input = PixelBuffer::filled(2, 2, [180, 100, 80, 77]);
        let output = sharpen(&input, 1.1);
        let px = output.pixel(0, 0);
        assert!(px[0] > 180);
        assert!(px[2] < 80);
        assert_eq!(px[3], 77);
    }

    #[test]
    fn post_process_resizes_to_target() {
        let output = post_process(&checker(4, 4), 0.1, 10, 6, &PostProcessConfig::default())
            .unwrap();
        assert_eq!((output.width(), output.height()), (10, 6));
    }
}

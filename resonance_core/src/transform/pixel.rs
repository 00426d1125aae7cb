//! Field-modulated color and brightness transform.
//!
//! For every pixel:
//!
//! 1. contrast then brightness around the 0.5 midpoint, with both parameters
//!    nudged by every mood category activation;
//! 2. a field influence in `[-1, 1]` from two sine waves over the normalised
//!    pixel coordinates, phase-shifted by the local knot density and by a
//!    random offset drawn once per call;
//! 3. a harmony-driven color temperature shift and saturation change, both
//!    modulated by the field influence;
//! 4. a final field-driven brightness delta.
//!
//! Alpha is copied from the source pixel unchanged.

use std::f64::consts::{PI, TAU};

use rayon::prelude::*;
use resonance_shared::{PixelBuffer, RandomSource, CHANNELS};

use crate::error::{ResonanceError, ResonanceResult};
use crate::resample::ResampledKnotMap;

const ACTIVATION_BRIGHTNESS_GAIN: f64 = 0.15;
const ACTIVATION_CONTRAST_GAIN: f64 = 0.10;
const GRADE_GAIN: f64 = 0.25;
const COLOR_MODULATION: f64 = 0.15;
const BRIGHTNESS_MODULATION: f64 = 0.10;

/// Global phase offsets shared by every pixel of one transform call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WavePhase {
    pub x: f64,
    pub y: f64,
}

impl WavePhase {
    /// Draws both offsets uniformly from `[0, 2π)`.
    pub fn draw<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: rng.next_unit() * TAU,
            y: rng.next_unit() * TAU,
        }
    }
}

/// Brightness and contrast after folding in the category activations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneAdjustment {
    pub brightness: f64,
    pub contrast: f64,
}

impl ToneAdjustment {
    /// Applies each activation in order:
    /// `brightness += (a - 0.5) * 0.15`, `contrast *= 1 + (a - 0.5) * 0.10`.
    pub fn fold(brightness: f64, contrast: f64, activations: &[f64]) -> Self {
        activations.iter().fold(
            Self {
                brightness,
                contrast,
            },
            |tone, &activation| Self {
                brightness: tone.brightness + (activation - 0.5) * ACTIVATION_BRIGHTNESS_GAIN,
                contrast: tone.contrast * (1.0 + (activation - 0.5) * ACTIVATION_CONTRAST_GAIN),
            },
        )
    }

    fn apply(&self, channel: f64) -> f64 {
        ((channel - 0.5) * self.contrast + 0.5 + self.brightness).clamp(0.0, 1.0)
    }
}

/// Harmony-dependent wave frequencies and grading strengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonyGrade {
    pub harmony: f64,
    pub freq_x: f64,
    pub freq_y: f64,
    pub temperature: f64,
    pub saturation: f64,
    pub color_modulation: f64,
    pub brightness_modulation: f64,
}

impl HarmonyGrade {
    pub fn new(harmony: f64) -> Self {
        let harmony = harmony.clamp(0.0, 1.0);
        let shift = (harmony - 0.5) * GRADE_GAIN;
        Self {
            harmony,
            freq_x: 3.0 + harmony * 4.0,
            freq_y: 2.0 + harmony * 3.0,
            temperature: shift,
            saturation: 1.0 + shift,
            color_modulation: COLOR_MODULATION * (1.0 - harmony),
            brightness_modulation: BRIGHTNESS_MODULATION * (1.0 - harmony),
        }
    }

    /// Average of the two coordinate waves, in `[-1, 1]`.
    pub fn field_influence(&self, u: f64, v: f64, knot: f64, phase: WavePhase) -> f64 {
        let knot_phase = knot * PI;
        let wave_x = (TAU * self.freq_x * u + knot_phase + phase.x).sin();
        let wave_y = (TAU * self.freq_y * v + knot_phase + phase.y).sin();
        (wave_x + wave_y) / 2.0
    }

    /// Temperature, saturation and brightness grading for one pixel.
    fn grade(&self, [r, g, b]: [f64; 3], influence: f64) -> [f64; 3] {
        let modulation = 1.0 + influence * self.color_modulation;
        let temperature = self.temperature * modulation;
        let saturation = self.saturation * modulation;

        let [r, g, b] = shift_temperature([r, g, b], temperature);

        let luma = 0.299 * r + 0.587 * g + 0.114 * b;
        let delta = influence * self.brightness_modulation;
        [
            luma + (r - luma) * saturation + delta,
            luma + (g - luma) * saturation + delta,
            luma + (b - luma) * saturation + delta,
        ]
    }
}

/// Warming lifts red more than green and pulls blue down; cooling lifts blue
/// more than it pulls red down and leaves green alone.
fn shift_temperature([r, g, b]: [f64; 3], temperature: f64) -> [f64; 3] {
    if temperature > 0.0 {
        [
            r * (1.0 + temperature),
            g * (1.0 + temperature * 0.5),
            b * (1.0 - temperature * 0.5),
        ]
    } else if temperature < 0.0 {
        let cool = -temperature;
        [r * (1.0 - cool * 0.5), g, b * (1.0 + cool)]
    } else {
        [r, g, b]
    }
}

/// Per-pixel transform with its once-per-call inputs resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelTransformer {
    pub tone: ToneAdjustment,
    pub grade: HarmonyGrade,
}

impl PixelTransformer {
    pub fn new(
        activations: &[f64],
        brightness: f64,
        contrast: f64,
        harmony: f64,
    ) -> ResonanceResult<Self> {
        ensure_finite("brightness", brightness)?;
        ensure_finite("contrast", contrast)?;
        ensure_finite("harmony", harmony)?;
        if let Some(bad) = activations.iter().find(|value| !value.is_finite()) {
            return Err(ResonanceError::invalid_param(
                "activations",
                bad,
                "every activation must be finite",
            ));
        }
        Ok(Self {
            tone: ToneAdjustment::fold(brightness, contrast, activations),
            grade: HarmonyGrade::new(harmony),
        })
    }

    /// Shades one pixel given its channels in `[0, 1]` and its field influence.
    pub fn shade(&self, rgb: [f64; 3], influence: f64) -> [u8; 3] {
        let toned = rgb.map(|channel| self.tone.apply(channel));
        self.grade.grade(toned, influence).map(to_byte)
    }

    /// Transforms `input` into a new buffer of the same size.
    pub fn apply(
        &self,
        input: &PixelBuffer,
        knot_map: &ResampledKnotMap,
        phase: WavePhase,
    ) -> ResonanceResult<PixelBuffer> {
        let (width, height) = (input.width(), input.height());
        if (knot_map.width(), knot_map.height()) != (width, height) {
            return Err(ResonanceError::dimension_mismatch(
                (width, height),
                (knot_map.width(), knot_map.height()),
                "pixel transform knot map",
            ));
        }

        let mut data = input.data().to_vec();
        data.par_chunks_mut(CHANNELS)
            .enumerate()
            .for_each(|(index, pixel)| {
                let (x, y) = (index % width, index / width);
                let knot = knot_map.at(x, y);
                let influence = self.grade.field_influence(
                    x as f64 / width as f64,
                    y as f64 / height as f64,
                    knot,
                    phase,
                );
                let rgb = [pixel[0], pixel[1], pixel[2]].map(|byte| f64::from(byte) / 255.0);
                let [r, g, b] = self.shade(rgb, influence);
                pixel[0] = r;
                pixel[1] = g;
                pixel[2] = b;
            });

        Ok(PixelBuffer::new(width, height, data)?)
    }
}

/// Transforms `input`, drawing the global wave phase from `rng`.
///
/// Two calls with identical inputs differ unless `rng` repeats its draws.
pub fn transform<R: RandomSource + ?Sized>(
    input: &PixelBuffer,
    activations: &[f64],
    brightness: f64,
    contrast: f64,
    knot_map: &ResampledKnotMap,
    harmony: f64,
    rng: &mut R,
) -> ResonanceResult<PixelBuffer> {
    let transformer = PixelTransformer::new(activations, brightness, contrast, harmony)?;
    let phase = WavePhase::draw(rng);
    tracing::debug!(
        width = input.width(),
        height = input.height(),
        harmony = transformer.grade.harmony,
        "applying pixel transform"
    );
    transformer.apply(input, knot_map, phase)
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

fn ensure_finite(parameter: &str, value: f64) -> ResonanceResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ResonanceError::invalid_param(parameter, value, "must be finite"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonance_shared::{FixedSource, RngSource};

    const NEUTRAL: [f64; 5] = [0.5; 5];

    fn gradient(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            [(x * 37 % 256) as u8, (y * 53 % 256) as u8, ((x + y) * 11 % 256) as u8, (x * 7) as u8]
        })
    }

    #[test]
    fn neutral_inputs_with_zero_influence_are_identity() {
        let transformer = PixelTransformer::new(&NEUTRAL, 0.0, 1.0, 0.5).unwrap();
        for byte in 0..=255u8 {
            let rgb = [byte, 255 - byte, byte / 2].map(|b| f64::from(b) / 255.0);
            assert_eq!(transformer.shade(rgb, 0.0), [byte, 255 - byte, byte / 2]);
        }
    }

    #[test]
    fn cooling_grade_with_field_influence() {
        // h = 0.1: shift -0.1, colour modulation 1 + 0.6 * 0.135, brightness delta 0.6 * 0.09
        let transformer = PixelTransformer::new(&NEUTRAL, 0.0, 1.0, 0.1).unwrap();
        assert_eq!(transformer.shade([0.8, 0.3, 0.1], 0.6), [204, 91, 44]);
    }

    #[test]
    fn warming_grade_with_field_influence() {
        // h = 0.7: shift 0.05, colour modulation 1 + 0.8 * 0.045, brightness delta 0.8 * 0.03
        let transformer = PixelTransformer::new(&NEUTRAL, 0.0, 1.0, 0.7).unwrap();
        assert_eq!(transformer.shade([0.7, 0.2, 0.6], 0.8), [201, 54, 159]);
    }

    #[test]
    fn activations_fold_cumulatively() {
        let tone = ToneAdjustment::fold(0.1, 1.0, &[1.0, 0.0, 0.7]);
        let expected_brightness = 0.1 + 0.5 * 0.15 - 0.5 * 0.15 + 0.2 * 0.15;
        let expected_contrast = 1.0 * 1.05 * 0.95 * 1.02;
        assert!((tone.brightness - expected_brightness).abs() < 1e-12);
        assert!((tone.contrast - expected_contrast).abs() < 1e-12);
    }

    #[test]
    fn warming_and_cooling_are_asymmetric() {
        let warm = shift_temperature([0.5, 0.5, 0.5], 0.1);
        assert!(warm[0] > warm[1] && warm[1] > 0.5 && warm[2] < 0.5);

        let cool = shift_temperature([0.5, 0.5, 0.5], -0.1);
        assert_eq!(cool[1], 0.5);
        assert!(cool[2] - 0.5 > 0.5 - cool[0]);
        assert!(cool[0] < 0.5);
    }

    #[test]
    fn field_influence_is_bounded_and_knot_sensitive() {
        let grade = HarmonyGrade::new(0.3);
        let phase = WavePhase { x: 0.4, y: 1.1 };
        let a = grade.field_influence(0.25, 0.5, 0.0, phase);
        let b = grade.field_influence(0.25, 0.5, 1.0, phase);
        assert!((-1.0..=1.0).contains(&a));
        // a knot value of 1 shifts both waves by π, flipping their sign
        assert!((a + b).abs() < 1e-12);
    }

    #[test]
    fn preserves_dimensions_and_alpha() {
        let input = gradient(17, 9);
        let map = ResampledKnotMap::uniform(17, 9, 0.3);
        let output = transform(
            &input,
            &[0.9, 0.1, 0.4, 0.6, 0.8],
            0.2,
            1.4,
            &map,
            0.1,
            &mut RngSource::seeded(5),
        )
        .unwrap();
        assert_eq!((output.width(), output.height()), (17, 9));
        for (src, dst) in input.pixels().zip(output.pixels()) {
            assert_eq!(src[3], dst[3]);
        }
    }

    #[test]
    fn fixed_phase_is_reproducible() {
        let input = gradient(8, 8);
        let map = ResampledKnotMap::uniform(8, 8, 0.5);
        let a = transform(&input, &NEUTRAL, 0.0, 1.0, &map, 0.8, &mut FixedSource::new(0.3)).unwrap();
        let b = transform(&input, &NEUTRAL, 0.0, 1.0, &map, 0.8, &mut FixedSource::new(0.3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn mismatched_knot_map_is_rejected() {
        let input = gradient(4, 4);
        let map = ResampledKnotMap::uniform(4, 5, 0.0);
        let err = transform(&input, &NEUTRAL, 0.0, 1.0, &map, 0.5, &mut FixedSource::zero())
            .unwrap_err();
        assert!(matches!(err, ResonanceError::DimensionMismatch { .. }));
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        assert!(PixelTransformer::new(&NEUTRAL, f64::NAN, 1.0, 0.5).is_err());
        assert!(PixelTransformer::new(&[0.5, f64::INFINITY], 0.0, 1.0, 0.5).is_err());
    }
}

//! Knot map resampling to image resolution.
//!
//! The knot grid is normalised by its peak, bilinearly interpolated onto the
//! target grid and normalised again, so the map handed to the pixel transform
//! spans `[0, 1]` whenever any knot was recorded, regardless of image size.
//! Sample positions are aligned on pixel centers, which makes resampling to
//! the source's own size an exact copy.

use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

use crate::error::{ResonanceError, ResonanceResult};
use crate::field::KnotMap;

/// Knot density at image resolution, shaped `(height, width)`, values in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResampledKnotMap {
    values: Array2<f64>,
}

impl ResampledKnotMap {
    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    pub fn height(&self) -> usize {
        self.values.nrows()
    }

    /// Value at pixel `(x, y)`.
    pub fn at(&self, x: usize, y: usize) -> f64 {
        self.values[[y, x]]
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Uniform map, mostly useful for tests and neutral renders.
    pub fn uniform(width: usize, height: usize, value: f64) -> Self {
        Self {
            values: Array2::from_elem((height, width), value.clamp(0.0, 1.0)),
        }
    }
}

/// Rescales `map` to `target_width x target_height`.
///
/// An all-zero map stays all-zero; no division by zero takes place.
pub fn resample_knot_map(
    map: &KnotMap,
    target_width: usize,
    target_height: usize,
) -> ResonanceResult<ResampledKnotMap> {
    ensure_target(target_width, target_height)?;
    if map.width() == 0 || map.height() == 0 {
        return Err(ResonanceError::invalid_param(
            "knot_map",
            format!("{}x{}", map.width(), map.height()),
            "source grid must not be empty",
        ));
    }

    if map.is_empty() {
        tracing::warn!("knot map holds no knots; resampled map is all zero");
    }

    let source = normalize_by_max(map.to_f64());
    let resized = resample_grid(&source, target_width, target_height)?;
    Ok(ResampledKnotMap {
        values: normalize_by_max(resized),
    })
}

/// Bilinear resampling of a `(rows, cols)` grid onto `(target_height, target_width)`.
///
/// Output pixel centers map back onto the source grid and are clamped to its
/// edges before interpolating.
pub fn resample_grid(
    source: &Array2<f64>,
    target_width: usize,
    target_height: usize,
) -> ResonanceResult<Array2<f64>> {
    ensure_target(target_width, target_height)?;
    let (rows, cols) = source.dim();
    if rows == 0 || cols == 0 {
        return Err(ResonanceError::invalid_param(
            "source",
            format!("{cols}x{rows}"),
            "source grid must not be empty",
        ));
    }

    let x_taps: Vec<Tap> = (0..target_width)
        .map(|x| Tap::new(x, cols, target_width))
        .collect();
    let y_taps: Vec<Tap> = (0..target_height)
        .map(|y| Tap::new(y, rows, target_height))
        .collect();

    let mut out = Array2::zeros((target_height, target_width));
    Zip::indexed(&mut out).par_for_each(|(y, x), value| {
        let ty = &y_taps[y];
        let tx = &x_taps[x];
        let top = source[[ty.lo, tx.lo]] * (1.0 - tx.frac) + source[[ty.lo, tx.hi]] * tx.frac;
        let bottom = source[[ty.hi, tx.lo]] * (1.0 - tx.frac) + source[[ty.hi, tx.hi]] * tx.frac;
        *value = top * (1.0 - ty.frac) + bottom * ty.frac;
    });
    Ok(out)
}

/// Divides by the maximum, treating a non-positive maximum as 1.
fn normalize_by_max(mut grid: Array2<f64>) -> Array2<f64> {
    let max = grid.iter().copied().fold(0.0f64, f64::max);
    let divisor = if max > 0.0 { max } else { 1.0 };
    grid.par_mapv_inplace(|value| (value / divisor).clamp(0.0, 1.0));
    grid
}

fn ensure_target(width: usize, height: usize) -> ResonanceResult<()> {
    if width == 0 || height == 0 {
        return Err(ResonanceError::invalid_param(
            "target",
            format!("{width}x{height}"),
            "target dimensions must be positive",
        ));
    }
    Ok(())
}

/// Interpolation taps along one axis.
struct Tap {
    lo: usize,
    hi: usize,
    frac: f64,
}

impl Tap {
    fn new(index: usize, source_len: usize, target_len: usize) -> Self {
        let scale = source_len as f64 / target_len as f64;
        let position = ((index as f64 + 0.5) * scale - 0.5).clamp(0.0, (source_len - 1) as f64);
        let lo = position.floor() as usize;
        let hi = (lo + 1).min(source_len - 1);
        Self {
            lo,
            hi,
            frac: position - lo as f64,
        }
    }
}

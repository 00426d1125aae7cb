use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Per-cell knot counts accumulated over one simulation run.
///
/// The array is indexed `[row, col]` with shape `(H, W)`. Every entry lies in
/// `[0, T]` because a cell can register at most one knot per step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnotMap {
    pub counts: Array2<u32>,
}

impl KnotMap {
    /// All-zero map for a `width x height` grid.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            counts: Array2::zeros((height, width)),
        }
    }

    pub fn from_counts(counts: Array2<u32>) -> Self {
        Self { counts }
    }

    pub fn width(&self) -> usize {
        self.counts.ncols()
    }

    pub fn height(&self) -> usize {
        self.counts.nrows()
    }

    /// Count at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.counts[[row, col]]
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Sum over all cells; equals the run's total knot count.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&count| u64::from(count)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Counts as floating point values, ready for resampling.
    pub fn to_f64(&self) -> Array2<f64> {
        self.counts.mapv(f64::from)
    }
}

/// Raw (unrounded) energy of every detected knot, in detection order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KnotEventLog {
    energies: Vec<f64>,
}

impl KnotEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, energy: f64) {
        self.energies.push(energy);
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }
}

impl From<Vec<f64>> for KnotEventLog {
    fn from(energies: Vec<f64>) -> Self {
        Self { energies }
    }
}

impl Extend<f64> for KnotEventLog {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        self.energies.extend(iter);
    }
}

//! Uniform random sources.
//!
//! The simulator and the pixel transformer draw from a [`RandomSource`] handed
//! in by the caller rather than from an ambient generator, so tests can swap in
//! [`FixedSource`] or [`SequenceSource`] and get repeatable output.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Supplier of uniform doubles in `[0, 1)`.
pub trait RandomSource {
    /// Draws the next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Fills `out` with consecutive draws.
    fn fill_unit(&mut self, out: &mut [f64]) {
        for value in out.iter_mut() {
            *value = self.next_unit();
        }
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }

    fn fill_unit(&mut self, out: &mut [f64]) {
        (**self).fill_unit(out)
    }
}

/// Adapter exposing any [`rand::Rng`] as a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Deterministic source, useful for reproducible renders.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Thread-local generator; every run differs.
pub fn thread_source() -> RngSource<ThreadRng> {
    RngSource::new(rand::thread_rng())
}

/// Source that always returns the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSource {
    value: f64,
}

impl FixedSource {
    /// Values outside `[0, 1)` are clamped into range.
    pub fn new(value: f64) -> Self {
        let value = if value.is_finite() {
            value.clamp(0.0, 1.0 - f64::EPSILON)
        } else {
            0.0
        };
        Self { value }
    }

    pub fn zero() -> Self {
        Self::new(0.0)
    }
}

impl RandomSource for FixedSource {
    fn next_unit(&mut self) -> f64 {
        self.value
    }
}

/// Source replaying a fixed list of values, wrapping around at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    /// An empty sequence behaves like [`FixedSource::zero`].
    pub fn new(values: Vec<f64>) -> Self {
        let values = values
            .into_iter()
            .map(|value| FixedSource::new(value).value)
            .collect();
        Self { values, cursor: 0 }
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

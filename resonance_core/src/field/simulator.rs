//! Time-stepped energy/phase field simulation.
//!
//! Each step rebuilds both fields from scratch:
//!
//! ```text
//! spatial(row, col) = sin(x[col]) * cos(y[row])      x, y = linspace(0, 2π)
//! energy(row, col)  = clamp(|sin(2π f_e t / T) + spatial| / 2 + noise * U, 0, 1 + noise)
//! phase(row, col)   = clamp(|sin(2π f_p t / T) + spatial| / 2 + noise * U', 0, 1 + noise)
//! ```
//!
//! A cell is a knot in that step when both values exceed the threshold and
//! agree after rounding to `precision` decimal places.

use std::f64::consts::TAU;

use ndarray::{Array1, Array2, Zip};
use resonance_shared::RandomSource;
use serde::{Deserialize, Serialize};

use super::knot_map::{KnotEventLog, KnotMap};
use crate::config::SimulationConfig;
use crate::error::ResonanceResult;

/// Energy and phase values of a single step, both shaped `(H, W)`.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldGrid {
    pub energy: Array2<f64>,
    pub phase: Array2<f64>,
}

/// Everything one simulation run produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub knot_map: KnotMap,
    pub event_log: KnotEventLog,
    pub total_knots: usize,
    /// Knots detected in each step, indexed by `t`.
    pub step_knots: Vec<usize>,
}

impl SimulationRun {
    /// The knot map and total count, dropping the event log.
    pub fn into_parts(self) -> (KnotMap, usize) {
        (self.knot_map, self.total_knots)
    }
}

/// Generates fields and accumulates knots for a validated configuration.
///
/// The simulator holds no state between runs; [`FieldSimulator::run`] builds
/// a fresh knot map and event log every time.
#[derive(Clone, Debug)]
pub struct FieldSimulator {
    config: SimulationConfig,
    spatial: Array2<f64>,
    rounding_factor: f64,
}

impl FieldSimulator {
    pub fn new(config: SimulationConfig) -> ResonanceResult<Self> {
        config.validate()?;
        let xs = Array1::linspace(0.0, TAU, config.width);
        let ys = Array1::linspace(0.0, TAU, config.height);
        let spatial = Array2::from_shape_fn((config.height, config.width), |(row, col)| {
            xs[col].sin() * ys[row].cos()
        });
        Ok(Self {
            config,
            spatial,
            rounding_factor: 10f64.powi(config.precision as i32),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Time phase `sin(2π f t / T)` for step `t`.
    fn time_phase(&self, frequency: f64, t: usize) -> f64 {
        (TAU * frequency * t as f64 / self.config.duration as f64).sin()
    }

    /// Builds the energy and phase grids for step `t`.
    ///
    /// Draws one value per cell for the energy field, then one per cell for the
    /// phase field, both in row-major order.
    pub fn step_fields<R: RandomSource + ?Sized>(&self, t: usize, rng: &mut R) -> FieldGrid {
        let shape = self.spatial.dim();
        let energy_draws = Array2::from_shape_fn(shape, |_| rng.next_unit());
        let phase_draws = Array2::from_shape_fn(shape, |_| rng.next_unit());
        FieldGrid {
            energy: self.field(
                self.time_phase(self.config.energy_frequency, t),
                &energy_draws,
            ),
            phase: self.field(self.time_phase(self.config.phase_frequency, t), &phase_draws),
        }
    }

    fn field(&self, time_phase: f64, draws: &Array2<f64>) -> Array2<f64> {
        let noise = self.config.noise;
        let mut out = Array2::zeros(self.spatial.dim());
        Zip::from(&mut out)
            .and(&self.spatial)
            .and(draws)
            .par_for_each(|value, &spatial, &draw| {
                let raw = (time_phase + spatial).abs() / 2.0 + noise * draw;
                *value = raw.clamp(0.0, 1.0 + noise);
            });
        out
    }

    fn round(&self, value: f64) -> i64 {
        (value * self.rounding_factor).round() as i64
    }

    /// Knot condition for a single cell.
    pub fn is_knot(&self, energy: f64, phase: f64) -> bool {
        let threshold = self.config.threshold;
        energy > threshold && phase > threshold && self.round(energy) == self.round(phase)
    }

    /// Runs all `T` steps and returns the accumulated knots.
    pub fn run<R: RandomSource + ?Sized>(&self, rng: &mut R) -> SimulationRun {
        let mut knot_map = KnotMap::zeros(self.config.width, self.config.height);
        let mut event_log = KnotEventLog::new();
        let mut step_knots = Vec::with_capacity(self.config.duration);

        for t in 0..self.config.duration {
            let grid = self.step_fields(t, rng);
            let mut knots = 0usize;
            Zip::from(&mut knot_map.counts)
                .and(&grid.energy)
                .and(&grid.phase)
                .for_each(|count, &energy, &phase| {
                    if self.is_knot(energy, phase) {
                        *count += 1;
                        event_log.push(energy);
                        knots += 1;
                    }
                });
            step_knots.push(knots);
        }

        let total_knots = step_knots.iter().sum();
        tracing::debug!(
            width = self.config.width,
            height = self.config.height,
            duration = self.config.duration,
            total_knots,
            "field simulation complete"
        );

        SimulationRun {
            knot_map,
            event_log,
            total_knots,
            step_knots,
        }
    }
}

/// Validates `config` and runs one simulation.
///
/// # Examples
///
/// ```
/// use resonance_field_core::{simulate, SimulationConfig};
/// use resonance_shared::RngSource;
///
/// let config = SimulationConfig { width: 16, height: 8, duration: 4, ..SimulationConfig::default() };
/// let run = simulate(config, &mut RngSource::seeded(1)).unwrap();
/// assert_eq!(run.knot_map.counts.dim(), (8, 16));
/// assert_eq!(run.total_knots, run.event_log.len());
/// ```
pub fn simulate<R: RandomSource + ?Sized>(
    config: SimulationConfig,
    rng: &mut R,
) -> ResonanceResult<SimulationRun> {
    Ok(FieldSimulator::new(config)?.run(rng))
}

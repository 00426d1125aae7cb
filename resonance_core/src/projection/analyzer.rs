//! Statistical projection of knot energies onto a bounded harmony score.
//!
//! Raw energies are prescaled by `k = 5.0` and the caller's Re(s) scale `c`,
//! then summarised with population statistics. The harmony score rewards a
//! mean close to the 0.5 target and a tight spread:
//!
//! ```text
//! proximity     = 1 - min(1, |mean - 0.5| / 0.25)
//! concentration = 1 - min(1, stddev / 0.15)
//! harmony       = clamp(0.6 * proximity + 0.4 * concentration, 0, 1)
//! ```

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::field::KnotEventLog;

/// Fixed internal prescale factor `k`.
pub const PRESCALE: f64 = 5.0;
/// Value the projected distribution is expected to cluster around.
pub const TARGET: f64 = 0.5;
/// Half-width of the inclusive window counted by `count_near_target`.
pub const TARGET_RADIUS: f64 = 0.05;
/// Spread reported when fewer than two distinct values are available.
pub const FALLBACK_STDDEV: f64 = 1.0;

const PROXIMITY_SPAN: f64 = 0.5 * 0.5;
const CONCENTRATION_SPAN: f64 = 0.15;
const PROXIMITY_WEIGHT: f64 = 0.6;
const CONCENTRATION_WEIGHT: f64 = 0.4;

/// Summary statistics of the projected knot energies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiemannStats {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation, or 1.0 for too few or identical samples
    pub stddev: f64,
    /// Projected values within `TARGET ± TARGET_RADIUS`, bounds inclusive
    pub count_near_target: usize,
    pub total: usize,
    /// Bounded coherence score in `[0, 1]`
    pub harmony: f64,
    /// Effective factor `k * c` applied to every raw energy
    pub prescale: f64,
}

impl RiemannStats {
    /// Record returned for an empty event log.
    pub const DEGENERATE: RiemannStats = RiemannStats {
        mean: 0.0,
        median: 0.0,
        stddev: FALLBACK_STDDEV,
        count_near_target: 0,
        total: 0,
        harmony: 0.0,
        prescale: 0.0,
    };

    pub fn is_degenerate(&self) -> bool {
        self.total == 0
    }
}

impl Default for RiemannStats {
    fn default() -> Self {
        Self::DEGENERATE
    }
}

impl Display for RiemannStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RiemannStats n={} mean={:.4} median={:.4} stddev={:.4} near_target={} harmony={:.3}",
            self.total, self.mean, self.median, self.stddev, self.count_near_target, self.harmony,
        )
    }
}

/// Projects the event log and reduces it to [`RiemannStats`].
///
/// Non-finite energies carry no information and are skipped; a log with no
/// finite energies yields [`RiemannStats::DEGENERATE`].
///
/// # Examples
///
/// ```
/// use resonance_field_core::{analyze, KnotEventLog};
///
/// let stats = analyze(&KnotEventLog::from(vec![0.1, 0.1, 0.1]), 1.0);
/// assert_eq!(stats.stddev, 1.0);
/// assert_eq!(stats.count_near_target, 3);
/// assert!((stats.harmony - 0.6).abs() < 1e-12);
/// ```
pub fn analyze(log: &KnotEventLog, scale: f64) -> RiemannStats {
    let prescale = PRESCALE * scale;
    let mut projected: Vec<f64> = log
        .energies()
        .iter()
        .map(|&raw| raw * PRESCALE * scale)
        .filter(|value| value.is_finite())
        .collect();

    if projected.is_empty() {
        tracing::warn!(events = log.len(), "empty knot event log; using degenerate stats");
        return RiemannStats::DEGENERATE;
    }

    projected.sort_by(f64::total_cmp);
    let total = projected.len();
    let mean = projected.iter().sum::<f64>() / total as f64;
    let median = median_of_sorted(&projected);
    let range = projected[total - 1] - projected[0];
    let stddev = if total > 1 && range > 0.0 {
        let variance = projected
            .iter()
            .map(|value| {
                let diff = value - mean;
                diff * diff
            })
            .sum::<f64>()
            / total as f64;
        variance.sqrt()
    } else {
        FALLBACK_STDDEV
    };
    let count_near_target = projected
        .iter()
        .filter(|&&value| (value - TARGET).abs() <= TARGET_RADIUS)
        .count();

    RiemannStats {
        mean,
        median,
        stddev,
        count_near_target,
        total,
        harmony: harmony_score(mean, stddev),
        prescale,
    }
}

/// Weighted proximity/concentration score, clamped to `[0, 1]`.
pub fn harmony_score(mean: f64, stddev: f64) -> f64 {
    let proximity = 1.0 - ((mean - TARGET).abs() / PROXIMITY_SPAN).min(1.0);
    let concentration = 1.0 - (stddev / CONCENTRATION_SPAN).min(1.0);
    let harmony = PROXIMITY_WEIGHT * proximity + CONCENTRATION_WEIGHT * concentration;
    if harmony.is_nan() {
        0.0
    } else {
        harmony.clamp(0.0, 1.0)
    }
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(values: &[f64]) -> KnotEventLog {
        KnotEventLog::from(values.to_vec())
    }

    #[test]
    fn empty_log_is_degenerate() {
        let stats = analyze(&KnotEventLog::new(), 0.1);
        assert_eq!(stats, RiemannStats::DEGENERATE);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.median, 0.0);
        assert_eq!(stats.stddev, 1.0);
        assert_eq!(stats.count_near_target, 0);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.harmony, 0.0);
        assert!(stats.is_degenerate());
    }

    #[test]
    fn identical_values_fall_back_to_unit_stddev() {
        let stats = analyze(&log(&[0.1, 0.1, 0.1]), 1.0);
        assert_eq!(stats.stddev, 1.0);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.count_near_target, 3);
        assert!((stats.mean - 0.5).abs() < 1e-12);
        // proximity 1.0, concentration 0.0
        assert!((stats.harmony - 0.6).abs() < 1e-12);
        assert!((stats.prescale - 5.0).abs() < 1e-12);
    }

    #[test]
    fn single_value_uses_fallback() {
        let stats = analyze(&log(&[0.9]), 0.1);
        assert_eq!(stats.stddev, 1.0);
        assert!((stats.median - 0.45).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&stats.harmony));
    }

    #[test]
    fn population_statistics() {
        // projected with k*c = 5.0: [0.2, 0.4, 0.6, 0.8]
        let stats = analyze(&log(&[0.16, 0.04, 0.12, 0.08]), 1.0);
        assert!((stats.mean - 0.5).abs() < 1e-12);
        assert!((stats.median - 0.5).abs() < 1e-12);
        let expected_std = (0.05f64).sqrt();
        assert!((stats.stddev - expected_std).abs() < 1e-12);
        assert_eq!(stats.count_near_target, 0);
        assert!((stats.harmony - 0.6).abs() < 1e-12);
    }

    #[test]
    fn tight_cluster_near_target_scores_high() {
        let stats = analyze(&log(&[0.99, 1.0, 1.01, 1.0]), 0.1);
        assert_eq!(stats.count_near_target, 4);
        assert!(stats.harmony > 0.9);
    }

    #[test]
    fn harmony_stays_bounded_for_pathological_logs() {
        for values in [
            vec![0.0],
            vec![1e12, -1e12],
            vec![f64::NAN, 0.2],
            vec![0.0; 10],
            vec![f64::INFINITY],
        ] {
            let stats = analyze(&log(&values), 0.1);
            assert!((0.0..=1.0).contains(&stats.harmony), "{values:?}");
        }
        assert_eq!(harmony_score(f64::NAN, f64::NAN), 0.0);
    }
}

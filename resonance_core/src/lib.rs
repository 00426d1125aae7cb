//! # Resonance Field Core
//!
//! A stochastic resonance-field engine that drives a per-pixel color transform.
//! A time-stepped energy/phase simulation accumulates "knots" on a small grid,
//! the knot energies are projected onto a bounded harmony score, and both the
//! knot density and the harmony modulate brightness, temperature and saturation
//! of an input image.
//!
//! ## Quick Start
//!
//! ```rust
//! use resonance_field_core::{
//!     activations, analyze, extract_main_colors, resample_knot_map, simulate, transform,
//!     SimulationConfig,
//! };
//! use resonance_shared::{PixelBuffer, RngSource};
//!
//! let mut rng = RngSource::seeded(42);
//! let config = SimulationConfig { width: 32, height: 32, duration: 20, ..SimulationConfig::default() };
//!
//! let run = simulate(config, &mut rng).unwrap();
//! let stats = analyze(&run.event_log, config.scale);
//!
//! let image = PixelBuffer::filled(64, 48, [180, 120, 90, 255]);
//! let colors = extract_main_colors(&image, 5, &mut rng);
//! let knots = resample_knot_map(&run.knot_map, image.width(), image.height()).unwrap();
//! let output = transform(&image, &activations(&colors), 0.0, 1.0, &knots, stats.harmony, &mut rng)
//!     .unwrap();
//! assert_eq!(output.width(), 64);
//! ```
//!
//! ## Core Modules
//!
//! - [`field`] - Energy/phase simulation and knot accumulation
//! - [`projection`] - Harmony statistics over knot energies
//! - [`palette`] - Dominant colors and mood category activations
//! - [`resample`] - Knot map scaling to image resolution
//! - [`transform`] - Per-pixel transform and post-processing
//! - [`config`] - Engine configuration via TOML
//! - [`logging`] - JSON line-delimited run records

pub mod config;
pub mod error;
pub mod field;
pub mod logging;
pub mod palette;
pub mod pipeline;
pub mod projection;
pub mod resample;
pub mod transform;

pub use config::{ConfigError, EngineConfig, PostProcessConfig, SimulationConfig, TransformConfig};
pub use error::{ResonanceError, ResonanceResult};
pub use field::{simulate, FieldGrid, FieldSimulator, KnotEventLog, KnotMap, SimulationRun};
pub use palette::{activations, extract_main_colors, MainColor, MoodCategory};
pub use pipeline::{RenderOutcome, ResonancePipeline};
pub use projection::{analyze, RiemannStats};
pub use resample::{resample_grid, resample_knot_map, ResampledKnotMap};
pub use transform::{
    post_process, resize, transform, HarmonyGrade, PixelTransformer, PostEffect, ToneAdjustment,
    WavePhase,
};

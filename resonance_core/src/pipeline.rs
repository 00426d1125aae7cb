//! End-to-end render: simulate, project, profile, resample, transform, finish.

use resonance_shared::{PixelBuffer, RandomSource};

use crate::config::EngineConfig;
use crate::error::{ResonanceError, ResonanceResult};
use crate::field::FieldSimulator;
use crate::palette::{activations, extract_main_colors, MainColor, MoodCategory};
use crate::projection::{analyze, RiemannStats};
use crate::resample::resample_knot_map;
use crate::transform::{post_process, PixelTransformer, PostEffect, WavePhase};

/// Result of one full render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    pub image: PixelBuffer,
    pub stats: RiemannStats,
    pub main_colors: Vec<MainColor>,
    pub activations: [f64; MoodCategory::COUNT],
    pub total_knots: usize,
    pub step_knots: Vec<usize>,
    pub effect: PostEffect,
}

/// Runs every stage with one validated [`EngineConfig`].
///
/// # Examples
///
/// ```
/// use resonance_field_core::{EngineConfig, ResonancePipeline};
/// use resonance_shared::{PixelBuffer, RngSource};
///
/// let mut config = EngineConfig::default();
/// config.simulation.width = 16;
/// config.simulation.height = 16;
/// config.simulation.duration = 8;
///
/// let pipeline = ResonancePipeline::new(config).unwrap();
/// let input = PixelBuffer::filled(20, 10, [120, 80, 200, 255]);
/// let outcome = pipeline.render(&input, &mut RngSource::seeded(3)).unwrap();
/// assert_eq!((outcome.image.width(), outcome.image.height()), (20, 10));
/// assert!((0.0..=1.0).contains(&outcome.stats.harmony));
/// ```
#[derive(Debug, Clone)]
pub struct ResonancePipeline {
    config: EngineConfig,
    simulator: FieldSimulator,
}

impl ResonancePipeline {
    pub fn new(config: EngineConfig) -> ResonanceResult<Self> {
        config.validate()?;
        Ok(Self {
            simulator: FieldSimulator::new(config.simulation)?,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn render<R: RandomSource + ?Sized>(
        &self,
        input: &PixelBuffer,
        rng: &mut R,
    ) -> ResonanceResult<RenderOutcome> {
        if input.is_empty() {
            return Err(ResonanceError::resource(
                "render input",
                format!("pixel buffer is {}x{}", input.width(), input.height()),
            ));
        }

        let run = self.simulator.run(rng);
        let stats = analyze(&run.event_log, self.config.simulation.scale);
        tracing::info!(total_knots = run.total_knots, %stats, "field projected");

        let main_colors = extract_main_colors(input, self.config.transform.color_count, rng);
        let levels = activations(&main_colors);

        let knot_map = resample_knot_map(&run.knot_map, input.width(), input.height())?;
        let transformer = PixelTransformer::new(
            &levels,
            self.config.transform.brightness,
            self.config.transform.contrast,
            stats.harmony,
        )?;
        let transformed = transformer.apply(input, &knot_map, WavePhase::draw(rng))?;

        let post = &self.config.post;
        let (width, height) = post.output_size(input.width(), input.height());
        let image = post_process(&transformed, stats.harmony, width, height, post)?;
        tracing::info!(width, height, harmony = stats.harmony, "render complete");

        Ok(RenderOutcome {
            image,
            stats,
            main_colors,
            activations: levels,
            total_knots: run.total_knots,
            step_knots: run.step_knots,
            effect: PostEffect::select(stats.harmony, post),
        })
    }
}

//! Engine configuration management via TOML files.
//!
//! Every section and key is optional; missing values fall back to the
//! defaults below. Values are validated after parsing so a bad grid size or
//! duration fails before any simulation work starts.
//!
//! ```toml
//! [simulation]
//! width = 64
//! height = 64
//! duration = 60
//! threshold = 0.3
//!
//! [transform]
//! brightness = 0.05
//! contrast = 1.1
//!
//! [post]
//! output_width = 1024
//! output_height = 1024
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ResonanceError, ResonanceResult};
use crate::palette::MoodCategory;

/// Largest simulation grid accepted, in cells (`W * H`).
pub const MAX_GRID_CELLS: usize = 1 << 24;

/// Largest rounding precision accepted; `10^p` must stay exact in an `f64`.
pub const MAX_PRECISION: u32 = 15;

/// Parameters for one field simulation run.
///
/// # Examples
///
/// ```
/// use resonance_field_core::SimulationConfig;
///
/// let config = SimulationConfig {
///     width: 32,
///     height: 16,
///     ..SimulationConfig::default()
/// };
/// assert!(config.validate().is_ok());
///
/// let broken = SimulationConfig { duration: 0, ..config };
/// assert!(broken.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Grid width `W` (columns)
    pub width: usize,
    /// Grid height `H` (rows)
    pub height: usize,
    /// Number of discrete time steps `T`
    pub duration: usize,
    /// Energy field frequency `f_e`
    pub energy_frequency: f64,
    /// Phase field frequency `f_p`
    pub phase_frequency: f64,
    /// Noise amplitude added per cell
    pub noise: f64,
    /// Knot threshold both fields must exceed
    pub threshold: f64,
    /// Decimal places used when comparing energy and phase
    pub precision: u32,
    /// Re(s) scaling constant `c` for the projection
    pub scale: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            duration: 60,
            energy_frequency: 0.15,
            phase_frequency: 0.155,
            noise: 0.02,
            threshold: 0.3,
            precision: 3,
            scale: 0.10,
        }
    }
}

impl SimulationConfig {
    /// Checks every field, failing on the first invalid one.
    pub fn validate(&self) -> ResonanceResult<()> {
        for (name, value) in [
            ("simulation.width", self.width),
            ("simulation.height", self.height),
            ("simulation.duration", self.duration),
        ] {
            if value == 0 {
                return Err(ResonanceError::invalid_config(
                    name,
                    value,
                    "must be a positive integer",
                ));
            }
        }
        match self.width.checked_mul(self.height) {
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => {
                return Err(ResonanceError::invalid_config(
                    "simulation.width * simulation.height",
                    format!("{}x{}", self.width, self.height),
                    format!("grid must hold at most {MAX_GRID_CELLS} cells"),
                ));
            }
        }
        ensure_positive("simulation.energy_frequency", self.energy_frequency)?;
        ensure_positive("simulation.phase_frequency", self.phase_frequency)?;
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(ResonanceError::invalid_config(
                "simulation.noise",
                self.noise,
                "must be finite and non-negative",
            ));
        }
        if !self.threshold.is_finite() || !(0.0..1.0).contains(&self.threshold) {
            return Err(ResonanceError::invalid_config(
                "simulation.threshold",
                self.threshold,
                "must lie in [0, 1)",
            ));
        }
        if self.precision > MAX_PRECISION {
            return Err(ResonanceError::invalid_config(
                "simulation.precision",
                self.precision,
                format!("must be at most {MAX_PRECISION} decimal places"),
            ));
        }
        ensure_positive("simulation.scale", self.scale)
    }
}

/// Tone parameters for the pixel transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Base brightness bias added around the 0.5 midpoint
    pub brightness: f64,
    /// Base contrast multiplier
    pub contrast: f64,
    /// Number of dominant colors extracted from the input
    pub color_count: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
            color_count: MoodCategory::COUNT,
        }
    }
}

impl TransformConfig {
    pub fn validate(&self) -> ResonanceResult<()> {
        if !self.brightness.is_finite() || !(-1.0..=1.0).contains(&self.brightness) {
            return Err(ResonanceError::invalid_config(
                "transform.brightness",
                self.brightness,
                "must lie in [-1, 1]",
            ));
        }
        if !self.contrast.is_finite() || self.contrast < 0.0 {
            return Err(ResonanceError::invalid_config(
                "transform.contrast",
                self.contrast,
                "must be finite and non-negative",
            ));
        }
        if self.color_count == 0 {
            return Err(ResonanceError::invalid_config(
                "transform.color_count",
                self.color_count,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Settings for the resize/sharpen/blur step after the transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessConfig {
    /// Output width; `None` keeps the input width
    pub output_width: Option<usize>,
    /// Output height; `None` keeps the input height
    pub output_height: Option<usize>,
    /// Harmony above which the sharpening boost applies
    pub sharpen_threshold: f64,
    /// Harmony below which the blur applies
    pub blur_threshold: f64,
    /// Multiplier of the contrast and saturation boost
    pub sharpen_boost: f64,
    /// Blur radius in pixels per unit of `(1 - harmony)`
    pub blur_scale: f64,
    /// Upper bound on the blur radius in pixels
    pub max_blur_radius: usize,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            output_width: None,
            output_height: None,
            sharpen_threshold: 0.75,
            blur_threshold: 0.25,
            sharpen_boost: 1.10,
            blur_scale: 3.0,
            max_blur_radius: 3,
        }
    }
}

impl PostProcessConfig {
    pub fn validate(&self) -> ResonanceResult<()> {
        for (name, value) in [
            ("post.output_width", self.output_width),
            ("post.output_height", self.output_height),
        ] {
            if value == Some(0) {
                return Err(ResonanceError::invalid_config(
                    name,
                    0,
                    "must be positive when set",
                ));
            }
        }
        for (name, value) in [
            ("post.sharpen_threshold", self.sharpen_threshold),
            ("post.blur_threshold", self.blur_threshold),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ResonanceError::invalid_config(
                    name,
                    value,
                    "must lie in [0, 1]",
                ));
            }
        }
        if self.blur_threshold > self.sharpen_threshold {
            return Err(ResonanceError::invalid_config(
                "post.blur_threshold",
                self.blur_threshold,
                "must not exceed post.sharpen_threshold",
            ));
        }
        if !self.sharpen_boost.is_finite() || self.sharpen_boost < 1.0 {
            return Err(ResonanceError::invalid_config(
                "post.sharpen_boost",
                self.sharpen_boost,
                "must be finite and at least 1",
            ));
        }
        if !self.blur_scale.is_finite() || self.blur_scale < 0.0 {
            return Err(ResonanceError::invalid_config(
                "post.blur_scale",
                self.blur_scale,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Output dimensions for an input of `width x height`.
    pub fn output_size(&self, width: usize, height: usize) -> (usize, usize) {
        (
            self.output_width.unwrap_or(width),
            self.output_height.unwrap_or(height),
        )
    }
}

/// Engine configuration loaded from a TOML file.
///
/// # Examples
///
/// ```
/// use resonance_field_core::EngineConfig;
///
/// let config = EngineConfig::from_str("[simulation]\nwidth = 32\nduration = 10")
///     .expect("valid config");
/// assert_eq!(config.simulation.width, 32);
/// assert_eq!(config.simulation.height, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub simulation: SimulationConfig,
    pub transform: TransformConfig,
    pub post: PostProcessConfig,
}

impl EngineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ResonanceResult<()> {
        self.simulation.validate()?;
        self.transform.validate()?;
        self.post.validate()
    }
}

fn ensure_positive(name: &str, value: f64) -> ResonanceResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ResonanceError::invalid_config(
            name,
            value,
            "must be finite and positive",
        ))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
    Invalid(ResonanceError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {}", err),
            ConfigError::Parse(err) => write!(f, "Parse error: {}", err),
            ConfigError::Invalid(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<ResonanceError> for ConfigError {
    fn from(value: ResonanceError) -> Self {
        ConfigError::Invalid(value)
    }
}

impl From<ConfigError> for ResonanceError {
    fn from(value: ConfigError) -> Self {
        match value {
            ConfigError::Invalid(err) => err,
            ConfigError::Io(err) => ResonanceError::resource("config file", err.to_string()),
            ConfigError::Parse(msg) => ResonanceError::invalid_config("toml", "<document>", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_sections_missing() {
        let config = EngineConfig::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.transform.color_count, MoodCategory::COUNT);
    }

    #[test]
    fn parses_custom_values() {
        let toml = "[simulation]\nwidth = 8\nheight = 4\nduration = 3\nprecision = 2\n\n[transform]\ncontrast = 1.2\n\n[post]\noutput_width = 100";
        let config = EngineConfig::from_str(toml).unwrap();
        assert_eq!(config.simulation.width, 8);
        assert_eq!(config.simulation.height, 4);
        assert_eq!(config.simulation.duration, 3);
        assert_eq!(config.simulation.precision, 2);
        assert!((config.transform.contrast - 1.2).abs() < 1e-12);
        assert_eq!(config.post.output_size(10, 20), (100, 20));
    }

    #[test]
    fn zero_duration_fails_fast() {
        let err = EngineConfig::from_str("[simulation]\nduration = 0").unwrap_err();
        match err {
            ConfigError::Invalid(ResonanceError::InvalidConfiguration { parameter, .. }) => {
                assert_eq!(parameter, "simulation.duration");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_dimensions_are_parse_errors() {
        let err = EngineConfig::from_str("[simulation]\nwidth = -4").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn oversized_grids_are_rejected() {
        let config = SimulationConfig {
            width: usize::MAX / 2,
            height: 4,
            ..SimulationConfig::default()
        };
        assert!(config.validate().unwrap_err().is_configuration());

        let config = SimulationConfig {
            width: MAX_GRID_CELLS + 1,
            height: 1,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            width: MAX_GRID_CELLS,
            height: 1,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_reals() {
        let mut config = SimulationConfig::default();
        config.threshold = 1.0;
        assert!(config.validate().is_err());
        config.threshold = 0.0;
        assert!(config.validate().is_ok());
        config.scale = 0.0;
        assert!(config.validate().is_err());

        let post = PostProcessConfig {
            blur_threshold: 0.9,
            ..PostProcessConfig::default()
        };
        assert!(post.validate().is_err());
    }
}

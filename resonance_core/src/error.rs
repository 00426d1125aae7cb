//! Error types for the resonance field engine.
//!
//! Degenerate inputs (empty knot logs, zero-variance samples, all-zero knot
//! maps) are not errors; they resolve to defined default values. The variants
//! below cover configuration mistakes, mismatched inputs and buffers the host
//! could not provide.

use std::fmt;

use resonance_shared::PixelError;

/// Result type alias for engine operations
pub type ResonanceResult<T> = Result<T, ResonanceError>;

/// Error type for engine operations
#[derive(Debug, Clone, PartialEq)]
pub enum ResonanceError {
    /// Invalid simulation or render configuration
    InvalidConfiguration {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Input grids or buffers disagree on their dimensions
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
        context: String,
    },

    /// Invalid argument passed to an operation
    InvalidParameter {
        parameter: String,
        value: String,
        constraint: String,
    },

    /// Pixel buffer or drawing surface could not be obtained
    Resource { context: String, details: String },
}

impl fmt::Display for ResonanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResonanceError::InvalidConfiguration {
                parameter,
                value,
                reason,
            } => write!(
                f,
                "Invalid configuration: {} = {} ({})",
                parameter, value, reason
            ),
            ResonanceError::DimensionMismatch {
                expected,
                got,
                context,
            } => write!(
                f,
                "Dimension mismatch in {}: expected {}x{}, got {}x{}",
                context, expected.0, expected.1, got.0, got.1
            ),
            ResonanceError::InvalidParameter {
                parameter,
                value,
                constraint,
            } => write!(
                f,
                "Invalid parameter '{}' = {}: {}",
                parameter, value, constraint
            ),
            ResonanceError::Resource { context, details } => {
                write!(f, "Resource unavailable in {}: {}", context, details)
            }
        }
    }
}

impl std::error::Error for ResonanceError {}

impl ResonanceError {
    /// Create an invalid configuration error
    pub fn invalid_config(
        parameter: impl Into<String>,
        value: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        ResonanceError::InvalidConfiguration {
            parameter: parameter.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error; dimensions are `(width, height)`
    pub fn dimension_mismatch(
        expected: (usize, usize),
        got: (usize, usize),
        context: impl Into<String>,
    ) -> Self {
        ResonanceError::DimensionMismatch {
            expected,
            got,
            context: context.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(
        parameter: impl Into<String>,
        value: impl fmt::Display,
        constraint: impl Into<String>,
    ) -> Self {
        ResonanceError::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Create a resource error
    pub fn resource(context: impl Into<String>, details: impl Into<String>) -> Self {
        ResonanceError::Resource {
            context: context.into(),
            details: details.into(),
        }
    }

    /// True for errors caused by configuration the caller must fix
    pub fn is_configuration(&self) -> bool {
        matches!(self, ResonanceError::InvalidConfiguration { .. })
    }
}

impl From<PixelError> for ResonanceError {
    fn from(err: PixelError) -> Self {
        ResonanceError::resource("pixel buffer", err.to_string())
    }
}

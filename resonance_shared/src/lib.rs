//! Resonance Shared Library
//!
//! Collaborator abstractions shared by the resonance field engine and its hosts.
//!
//! This library provides:
//! - [`PixelBuffer`]: interleaved RGBA bytes with width and height
//! - [`RandomSource`]: the uniform random capability threaded through the engine

pub mod pixel;
pub mod random;

pub use pixel::{PixelBuffer, PixelError, CHANNELS};
pub use random::{thread_source, FixedSource, RandomSource, RngSource, SequenceSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

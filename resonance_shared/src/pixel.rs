//! Interleaved RGBA pixel buffers.
//!
//! Decoding and encoding images belongs to the host application. The engine
//! only needs the dimensions and row-major RGBA bytes, which is what
//! [`PixelBuffer`] carries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of interleaved channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Errors raised while acquiring or constructing a pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelError {
    /// The byte sequence does not hold exactly `width * height * 4` bytes.
    LengthMismatch {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },
    /// Width or height overflowed when computing the buffer size.
    Overflow { width: usize, height: usize },
}

impl fmt::Display for PixelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelError::LengthMismatch {
                width,
                height,
                expected,
                got,
            } => write!(
                f,
                "pixel buffer {width}x{height} needs {expected} RGBA bytes, got {got}"
            ),
            PixelError::Overflow { width, height } => {
                write!(f, "pixel buffer dimensions {width}x{height} overflow usize")
            }
        }
    }
}

impl std::error::Error for PixelError {}

/// Row-major RGBA image with 8 bits per channel.
///
/// # Examples
///
/// ```
/// use resonance_shared::PixelBuffer;
///
/// let buffer = PixelBuffer::filled(4, 2, [10, 20, 30, 255]);
/// assert_eq!(buffer.pixel(3, 1), [10, 20, 30, 255]);
/// assert_eq!(buffer.data().len(), 4 * 2 * 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPixelBuffer")]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

/// Unchecked wire form; every deserialized buffer goes through [`PixelBuffer::new`].
#[derive(Deserialize)]
struct RawPixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl TryFrom<RawPixelBuffer> for PixelBuffer {
    type Error = PixelError;

    fn try_from(raw: RawPixelBuffer) -> Result<Self, Self::Error> {
        PixelBuffer::new(raw.width, raw.height, raw.data)
    }
}

impl PixelBuffer {
    /// Wraps an existing RGBA byte sequence, checking its length.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, PixelError> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(PixelError::LengthMismatch {
                width,
                height,
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a buffer where every pixel holds `rgba`.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let pixels = width * height;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Builds a buffer by evaluating `f(x, y)` for every pixel in row-major order.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> [u8; 4],
    {
        let mut data = Vec::with_capacity(width * height * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// RGBA bytes of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = (y * self.width + x) * CHANNELS;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]
    }

    /// Iterates over pixels as RGBA chunks in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(CHANNELS)
    }
}

fn byte_len(width: usize, height: usize) -> Result<usize, PixelError> {
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(CHANNELS))
        .ok_or(PixelError::Overflow { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_short_buffers() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            PixelError::LengthMismatch {
                width: 2,
                height: 2,
                expected: 16,
                got: 15
            }
        );
    }

    #[test]
    fn from_fn_is_row_major() {
        let buffer = PixelBuffer::from_fn(3, 2, |x, y| [x as u8, y as u8, 0, 255]);
        assert_eq!(buffer.pixel(2, 0), [2, 0, 0, 255]);
        assert_eq!(buffer.pixel(0, 1), [0, 1, 0, 255]);
        assert_eq!(&buffer.data()[4..8], &[1, 0, 0, 255]);
    }

    #[test]
    fn deserialization_checks_the_byte_length() {
        let err = serde_json::from_str::<PixelBuffer>(
            r#"{"width":2,"height":2,"data":[100,100,100,100,100,100,100,100,100,100,100,100,100,100,100,100,100,100,100,100]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("needs 16 RGBA bytes, got 20"));

        let buffer = PixelBuffer::filled(2, 1, [1, 2, 3, 4]);
        let json = serde_json::to_string(&buffer).unwrap();
        assert_eq!(serde_json::from_str::<PixelBuffer>(&json).unwrap(), buffer);
    }

    #[test]
    fn zero_sized_buffers_are_valid() {
        let buffer = PixelBuffer::new(0, 5, Vec::new()).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.pixels().count(), 0);
    }
}

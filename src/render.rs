//! Intensity-image rendering of MAC matrices.
//!
//! A MAC matrix is shown as an image with one pixel per entry: row `i` is
//! master mode `i`, column `j` is slave mode `j`. Entries are clamped to
//! `[0, 1]` and quantised to 8 bits; NaN entries have no intensity.

use std::fmt;

use nalgebra::DMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shading ramp for text rendering, darkest to brightest.
const ASCII_RAMP: &[u8] = b" .:-=+*#%@";

/// Glyph for an undefined (NaN) entry.
const UNDEFINED_GLYPH: char = '?';

/// 8-bit grayscale image of a MAC matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntensityImage {
    /// Number of columns (slave modes).
    pub width: usize,
    /// Number of rows (master modes).
    pub height: usize,
    /// Row-major intensities, `None` where the MAC is undefined.
    pub pixels: Vec<Option<u8>>,
}

impl IntensityImage {
    /// Quantise a MAC matrix.
    #[must_use]
    pub fn from_mac(mac: &DMatrix<f64>) -> Self {
        let (height, width) = mac.shape();
        let pixels = mac
            .row_iter()
            .flat_map(|row| row.iter().map(|&v| quantize(v)).collect::<Vec<_>>())
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Intensity at `(row, col)`; outer `None` when out of bounds.
    #[must_use]
    pub fn pixel(&self, row: usize, col: usize) -> Option<Option<u8>> {
        if row < self.height && col < self.width {
            Some(self.pixels[row * self.width + col])
        } else {
            None
        }
    }

    /// Text rendering, one line per row, using a ten-level shading ramp.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.height * (self.width + 1));
        for row in self.pixels.chunks(self.width.max(1)).take(self.height) {
            out.extend(row.iter().map(|&p| glyph(p)));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for IntensityImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii())
    }
}

#[inline]
fn quantize(value: f64) -> Option<u8> {
    if value.is_nan() {
        None
    } else {
        Some((value.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

#[inline]
fn glyph(pixel: Option<u8>) -> char {
    pixel.map_or(UNDEFINED_GLYPH, |p| {
        let level = usize::from(p) * (ASCII_RAMP.len() - 1) / 255;
        char::from(ASCII_RAMP[level])
    })
}

//! Palettes organized in 16-color rows.

use super::{ImageError, PixelBuffer};
use crate::color::Color;
use std::collections::HashSet;

/// Colors per palette row, the span a 4-bit index can address.
pub const PALETTE_SIZE: usize = 16;

/// Rows selectable by a 4-bit palette-row field.
pub const MAX_PALETTE_ROWS: usize = 16;

/// An ordered list of colors, addressed as `row * 16 + index`.
///
/// Palettes are immutable once built and are shared between indexed images
/// through `Arc<Palette>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Build a palette from up to 256 colors (16 rows of 16).
    pub fn new(colors: Vec<Color>) -> Result<Self, ImageError> {
        if colors.is_empty() {
            return Err(ImageError::EmptyPalette);
        }
        if colors.len() > PALETTE_SIZE * MAX_PALETTE_ROWS {
            return Err(ImageError::TooManyColors(colors.len()));
        }
        Ok(Self { colors })
    }

    /// Collect the distinct colors of `buffer` in first-seen raster order.
    ///
    /// The result must fit a single 16-color row.
    pub fn from_pixels(buffer: &PixelBuffer) -> Result<Self, ImageError> {
        let mut seen = HashSet::new();
        let mut colors = Vec::with_capacity(PALETTE_SIZE);
        for color in buffer.iter_colors() {
            if seen.insert(color) {
                colors.push(color);
            }
        }
        if colors.len() > PALETTE_SIZE {
            return Err(ImageError::TooManyColors(colors.len()));
        }
        Self::new(colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Number of rows the palette spans, counting a partial last row.
    pub fn row_count(&self) -> usize {
        self.colors.len().div_ceil(PALETTE_SIZE)
    }

    /// The colors of one row. A partial last row yields a shorter slice.
    pub fn row(&self, row: usize) -> Option<&[Color]> {
        let start = row * PALETTE_SIZE;
        if start >= self.colors.len() {
            return None;
        }
        let end = (start + PALETTE_SIZE).min(self.colors.len());
        Some(&self.colors[start..end])
    }

    /// Resolve a 4-bit `index` within palette `row`.
    pub fn color_at(&self, index: u8, row: u8) -> Result<Color, ImageError> {
        if index as usize >= PALETTE_SIZE {
            return Err(ImageError::InvalidPaletteIndex(index as u32));
        }
        if row as usize >= MAX_PALETTE_ROWS {
            return Err(ImageError::InvalidPaletteRow(row as u32));
        }
        let offset = row as usize * PALETTE_SIZE + index as usize;
        self.colors
            .get(offset)
            .copied()
            .ok_or(ImageError::PaletteIndexOutOfRange { offset, len: self.colors.len() })
    }

    /// Index within `row` of the color closest to `color`.
    pub fn nearest_in_row(&self, color: Color, row: u8) -> Result<u8, ImageError> {
        let entries = self.row(row as usize).ok_or(ImageError::PaletteIndexOutOfRange {
            offset: row as usize * PALETTE_SIZE,
            len: self.colors.len(),
        })?;

        let mut best = 0;
        let mut best_distance = u32::MAX;
        for (i, entry) in entries.iter().enumerate() {
            let d = entry.distance_sq(color);
            if d < best_distance {
                best = i;
                best_distance = d;
                if d == 0 {
                    break;
                }
            }
        }
        Ok(best as u8)
    }
}

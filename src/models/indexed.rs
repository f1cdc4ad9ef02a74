//! 4-bit palette-indexed images.

use super::{Dimensions, Image, ImageCoordinates, ImageError, Palette, PixelBuffer};
use super::{MAX_PALETTE_ROWS, PALETTE_SIZE};
use crate::color::Color;
use std::sync::Arc;

/// An image whose pixels are 4-bit indices into one row of a shared palette.
///
/// The palette is shared, never owned: several images may point at the same
/// `Arc<Palette>` with different row selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    file_name: String,
    dimensions: Dimensions,
    indices: Vec<u8>,
    palette: Arc<Palette>,
    palette_row: u8,
}

impl IndexedImage {
    /// Build an indexed image from raw row-major indices.
    pub fn new(
        file_name: impl Into<String>,
        dimensions: Dimensions,
        indices: Vec<u8>,
        palette: Arc<Palette>,
        palette_row: u32,
    ) -> Result<Self, ImageError> {
        if indices.len() != dimensions.area() {
            return Err(ImageError::BufferLength {
                dimensions,
                expected: dimensions.area(),
                actual: indices.len(),
            });
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= PALETTE_SIZE) {
            return Err(ImageError::InvalidPaletteIndex(bad as u32));
        }
        let palette_row = check_row(&palette, palette_row)?;
        Ok(Self { file_name: file_name.into(), dimensions, indices, palette, palette_row })
    }

    /// An image of the given size with every pixel at index 0.
    pub fn blank(
        file_name: impl Into<String>,
        dimensions: Dimensions,
        palette: Arc<Palette>,
        palette_row: u32,
    ) -> Result<Self, ImageError> {
        Self::new(file_name, dimensions, vec![0; dimensions.area()], palette, palette_row)
    }

    /// Map every pixel of `buffer` to its nearest color in palette row `palette_row`.
    pub fn from_pixel_buffer(
        buffer: &PixelBuffer,
        palette: Arc<Palette>,
        palette_row: u32,
    ) -> Result<Self, ImageError> {
        let row = check_row(&palette, palette_row)?;
        let indices = buffer
            .iter_colors()
            .map(|color| palette.nearest_in_row(color, row))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "indexed '{}' ({}) against palette row {}",
            buffer.file_name(),
            buffer.dimensions(),
            row
        );
        Self::new(buffer.file_name(), buffer.dimensions(), indices, palette, palette_row)
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }

    pub fn palette_row(&self) -> u8 {
        self.palette_row
    }

    /// Select a different 16-color band. Rejected rows leave the image unchanged.
    pub fn set_palette_row(&mut self, row: u32) -> Result<(), ImageError> {
        match check_row(&self.palette, row) {
            Ok(row) => {
                self.palette_row = row;
                Ok(())
            }
            Err(e) => {
                log::warn!("'{}': rejected palette row {}: {}", self.file_name, row, e);
                Err(e)
            }
        }
    }

    /// Raw palette index stored at `pos`.
    pub fn index_at(&self, pos: ImageCoordinates) -> Result<u8, ImageError> {
        Ok(self.indices[self.dimensions.index_of(pos)?])
    }

    /// Store a palette index at `pos`.
    pub fn set_pixel_index(&mut self, pos: ImageCoordinates, index: u32) -> Result<(), ImageError> {
        let offset = self.dimensions.index_of(pos)?;
        if index as usize >= PALETTE_SIZE {
            return Err(ImageError::InvalidPaletteIndex(index));
        }
        self.indices[offset] = index as u8;
        Ok(())
    }
}

/// A row is usable when it fits the 4-bit selector and the palette reaches it.
fn check_row(palette: &Palette, row: u32) -> Result<u8, ImageError> {
    if row as usize >= MAX_PALETTE_ROWS {
        return Err(ImageError::InvalidPaletteRow(row));
    }
    if row as usize >= palette.row_count() {
        return Err(ImageError::PaletteIndexOutOfRange {
            offset: row as usize * PALETTE_SIZE,
            len: palette.len(),
        });
    }
    Ok(row as u8)
}

impl Image for IndexedImage {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn pixel_color_at(&self, pos: ImageCoordinates) -> Result<Color, ImageError> {
        let index = self.index_at(pos)?;
        self.palette.color_at(index, self.palette_row)
    }
}

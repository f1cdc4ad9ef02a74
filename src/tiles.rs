//! 8x8 tile decomposition for sprite-sheet export
//!
//! Tiles are carved in raster order: left to right across a tile row, then
//! down to the next tile row. Each tile is itself a row-major 8x8 grid of
//! resolved colors.

use crate::color::Color;
use crate::models::{Dimensions, Image, ImageCoordinates, ImageError};
use thiserror::Error;

/// Edge length of a tile in pixels.
pub const TILE_SIZE: u32 = 8;

/// Pixels per tile.
pub const TILE_AREA: usize = (TILE_SIZE * TILE_SIZE) as usize;

/// Error type for tile decomposition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    #[error("cannot split a {0} image into 8x8 tiles: width and height must be multiples of 8")]
    DimensionMismatch(Dimensions),
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// One 8x8 block of colors, `pixels[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub pixels: [[Color; TILE_SIZE as usize]; TILE_SIZE as usize],
}

impl Tile {
    pub fn color_at(&self, x: usize, y: usize) -> Color {
        self.pixels[y][x]
    }

    /// The 64 colors of the tile in row-major order.
    pub fn iter_colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.pixels.iter().flat_map(|row| row.iter().copied())
    }
}

/// Number of tiles an image of `dimensions` splits into, if it tiles evenly.
pub fn tile_count(dimensions: Dimensions) -> Result<usize, TileError> {
    check_tileable(dimensions)?;
    Ok(dimensions.area() / TILE_AREA)
}

fn check_tileable(dimensions: Dimensions) -> Result<(), TileError> {
    if dimensions.width() % TILE_SIZE != 0 || dimensions.height() % TILE_SIZE != 0 {
        return Err(TileError::DimensionMismatch(dimensions));
    }
    Ok(())
}

/// Top-left corners of every tile, in raster order.
pub fn tile_origins(dimensions: Dimensions) -> Result<Vec<ImageCoordinates>, TileError> {
    check_tileable(dimensions)?;
    let mut origins = Vec::with_capacity(dimensions.area() / TILE_AREA);
    for tile_row in (0..dimensions.height()).step_by(TILE_SIZE as usize) {
        for tile_col in (0..dimensions.width()).step_by(TILE_SIZE as usize) {
            origins.push(ImageCoordinates::new(tile_col, tile_row));
        }
    }
    Ok(origins)
}

/// Split `image` into 8x8 tiles of resolved colors.
///
/// Palette-indexed images are resolved through their palette row first, so
/// every tile holds final colors. Fails with [`TileError::DimensionMismatch`]
/// unless both dimensions are multiples of 8.
///
/// # Examples
///
/// ```
/// use spritec::color::Color;
/// use spritec::models::{Dimensions, PixelBuffer};
/// use spritec::tiles::decompose;
///
/// let dims = Dimensions::new(16, 8).unwrap();
/// let buffer = PixelBuffer::filled("sheet.png", dims, Color::WHITE);
/// let tiles = decompose(&buffer).unwrap();
/// assert_eq!(tiles.len(), 2);
/// ```
pub fn decompose<I: Image + ?Sized>(image: &I) -> Result<Vec<Tile>, TileError> {
    let origins = tile_origins(image.dimensions())?;
    let mut tiles = Vec::with_capacity(origins.len());

    for origin in origins {
        let mut tile = Tile { pixels: [[Color::default(); TILE_SIZE as usize]; TILE_SIZE as usize] };
        for dy in 0..TILE_SIZE {
            for dx in 0..TILE_SIZE {
                let pos = ImageCoordinates::new(origin.x + dx, origin.y + dy);
                tile.pixels[dy as usize][dx as usize] = image.pixel_color_at(pos)?;
            }
        }
        tiles.push(tile);
    }

    log::debug!("decomposed '{}' into {} tiles", image.file_name(), tiles.len());
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IndexedImage, Palette, PixelBuffer};
    use std::sync::Arc;

    /// A buffer whose pixel at (x, y) has r = x, g = y.
    fn coordinate_buffer(width: u32, height: u32) -> PixelBuffer {
        let dims = Dimensions::new(width, height).unwrap();
        let mut data = Vec::with_capacity(dims.area() * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, 0, 255]);
            }
        }
        PixelBuffer::new("coords.png", dims, data).unwrap()
    }

    #[test]
    fn test_single_tile() {
        let tiles = decompose(&coordinate_buffer(8, 8)).unwrap();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].color_at(3, 5), Color::new(3, 5, 0, 255));
    }

    #[test]
    fn test_tile_order_is_raster() {
        let buffer = coordinate_buffer(24, 16);
        let tiles = decompose(&buffer).unwrap();
        assert_eq!(tiles.len(), (24 * 16) / 64);

        // tile i starts at ((i % 3) * 8, (i / 3) * 8)
        for (i, tile) in tiles.iter().enumerate() {
            let ox = (i % 3) as u8 * 8;
            let oy = (i / 3) as u8 * 8;
            for y in 0..8 {
                for x in 0..8 {
                    assert_eq!(
                        tile.color_at(x, y),
                        Color::new(ox + x as u8, oy + y as u8, 0, 255),
                        "tile {} pixel ({}, {})",
                        i,
                        x,
                        y
                    );
                }
            }
        }
    }

    #[test]
    fn test_tile_iter_colors_row_major() {
        let tiles = decompose(&coordinate_buffer(8, 8)).unwrap();
        let colors: Vec<Color> = tiles[0].iter_colors().collect();
        assert_eq!(colors.len(), TILE_AREA);
        assert_eq!(colors[9], Color::new(1, 1, 0, 255));
        assert_eq!(colors[63], Color::new(7, 7, 0, 255));
    }

    #[test]
    fn test_dimension_mismatch() {
        let buffer = coordinate_buffer(12, 8);
        let err = decompose(&buffer).unwrap_err();
        assert_eq!(err, TileError::DimensionMismatch(Dimensions::new(12, 8).unwrap()));
        assert!(tile_count(Dimensions::new(8, 4).unwrap()).is_err());
    }

    #[test]
    fn test_tile_count() {
        assert_eq!(tile_count(Dimensions::new(8, 8).unwrap()), Ok(1));
        assert_eq!(tile_count(Dimensions::new(32, 64).unwrap()), Ok(32));
    }

    #[test]
    fn test_indexed_tiles_resolve_palette() {
        let palette = Arc::new(
            Palette::new((0..16).map(|i| Color::rgb(i * 16, 0, 0)).collect()).unwrap(),
        );
        let dims = Dimensions::new(16, 8).unwrap();
        let indices: Vec<u8> = (0..128).map(|i| ((i % 16) / 8) as u8 * 5).collect();
        let img = IndexedImage::new("idx.png", dims, indices, palette, 0).unwrap();

        let tiles = decompose(&img).unwrap();
        assert_eq!(tiles.len(), 2);
        assert!(tiles[0].iter_colors().all(|c| c == Color::rgb(0, 0, 0)));
        assert!(tiles[1].iter_colors().all(|c| c == Color::rgb(80, 0, 0)));
    }
}

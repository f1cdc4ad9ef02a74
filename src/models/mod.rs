//! Image data model: direct pixel buffers, palettes, and indexed images.

mod bitmap;
mod indexed;
mod palette;

pub use bitmap::PixelBuffer;
pub use indexed::IndexedImage;
pub use palette::{Palette, MAX_PALETTE_ROWS, PALETTE_SIZE};

use crate::color::Color;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Width and height of an image in pixels. Both are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::EmptyDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, pos: ImageCoordinates) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Flat row-major index of `pos`, or a bounds error.
    pub fn index_of(&self, pos: ImageCoordinates) -> Result<usize, ImageError> {
        if !self.contains(pos) {
            return Err(ImageError::OutOfBounds { pos, dimensions: *self });
        }
        Ok(self.width as usize * pos.y as usize + pos.x as usize)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A 0-indexed pixel position, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImageCoordinates {
    pub x: u32,
    pub y: u32,
}

impl ImageCoordinates {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for ImageCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Errors raised by image construction and pixel access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("image dimensions must be positive, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("pixel data has {actual} entries but {dimensions} needs {expected}")]
    BufferLength { dimensions: Dimensions, expected: usize, actual: usize },
    #[error("pixel {pos} is outside the {dimensions} image")]
    OutOfBounds { pos: ImageCoordinates, dimensions: Dimensions },
    #[error("{0} is not implemented for this image format")]
    Unimplemented(&'static str),
    #[error("palette row {0} is outside 0-15")]
    InvalidPaletteRow(u32),
    #[error("palette index {0} is outside 0-15")]
    InvalidPaletteIndex(u32),
    #[error("palette entry {offset} is past the end of a {len}-color palette")]
    PaletteIndexOutOfRange { offset: usize, len: usize },
    #[error("image uses {0} distinct colors, a palette row holds at most 16")]
    TooManyColors(usize),
    #[error("palette must contain at least one color")]
    EmptyPalette,
}

/// Common read access shared by the direct and indexed image formats.
pub trait Image {
    /// Source file name, used only to name generated artifacts.
    fn file_name(&self) -> &str;

    fn dimensions(&self) -> Dimensions;

    /// Resolved color of the pixel at `pos`.
    fn pixel_color_at(&self, pos: ImageCoordinates) -> Result<Color, ImageError>;

    /// Whether [`Image::set_pixel_color`] can succeed for this format.
    fn supports_pixel_mutation(&self) -> bool {
        false
    }

    /// Write a color at `pos`.
    ///
    /// Neither format implements color writes: the call logs a warning and
    /// returns [`ImageError::Unimplemented`], leaving the image untouched.
    fn set_pixel_color(&mut self, pos: ImageCoordinates, color: Color) -> Result<(), ImageError> {
        log::warn!(
            "set_pixel_color({}, {}) on '{}' is not implemented; image left unchanged",
            pos,
            color.to_hex(),
            self.file_name()
        );
        Err(ImageError::Unimplemented("set_pixel_color"))
    }

    /// Every pixel color in row-major order.
    fn colors(&self) -> Result<Vec<Color>, ImageError> {
        let dims = self.dimensions();
        let mut out = Vec::with_capacity(dims.area());
        for y in 0..dims.height() {
            for x in 0..dims.width() {
                out.push(self.pixel_color_at(ImageCoordinates::new(x, y))?);
            }
        }
        Ok(out)
    }
}

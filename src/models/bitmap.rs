//! Direct-format images: one RGBA quad per pixel.

use super::{Dimensions, Image, ImageCoordinates, ImageError};
use crate::color::Color;
use image::RgbaImage;

/// Bytes per pixel in a [`PixelBuffer`].
const CHANNELS: usize = 4;

/// A flat, row-major RGBA pixel store.
///
/// The buffer length always equals `width * height * 4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    file_name: String,
    dimensions: Dimensions,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(
        file_name: impl Into<String>,
        dimensions: Dimensions,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let expected = dimensions.area() * CHANNELS;
        if data.len() != expected {
            return Err(ImageError::BufferLength { dimensions, expected, actual: data.len() });
        }
        Ok(Self { file_name: file_name.into(), dimensions, data })
    }

    /// A buffer with every pixel set to `color`.
    pub fn filled(file_name: impl Into<String>, dimensions: Dimensions, color: Color) -> Self {
        let data = [color.r, color.g, color.b, color.a].repeat(dimensions.area());
        Self { file_name: file_name.into(), dimensions, data }
    }

    /// Wrap an already decoded image.
    pub fn from_rgba_image(file_name: impl Into<String>, image: RgbaImage) -> Result<Self, ImageError> {
        let dimensions = Dimensions::new(image.width(), image.height())?;
        Self::new(file_name, dimensions, image.into_raw())
    }

    /// Hand the pixels back as an `image` buffer, unchanged.
    pub fn to_rgba_image(&self) -> RgbaImage {
        // length invariant guarantees from_raw succeeds
        RgbaImage::from_raw(self.dimensions.width(), self.dimensions.height(), self.data.clone())
            .unwrap_or_else(|| RgbaImage::new(self.dimensions.width(), self.dimensions.height()))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Byte offset of the quad at `pos`: `(width * y + x) * 4`.
    pub fn offset(&self, pos: ImageCoordinates) -> Result<usize, ImageError> {
        Ok(self.dimensions.index_of(pos)? * CHANNELS)
    }

    /// Pixel colors in row-major order.
    pub fn iter_colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.data.chunks_exact(CHANNELS).map(|q| Color::new(q[0], q[1], q[2], q[3]))
    }
}

impl Image for PixelBuffer {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn pixel_color_at(&self, pos: ImageCoordinates) -> Result<Color, ImageError> {
        let offset = self.offset(pos)?;
        Ok(Color {
            r: self.data[offset],
            b: self.data[offset + 2],
            g: self.data[offset + 1],
            a: self.data[offset + 3],
        })
    }

    fn colors(&self) -> Result<Vec<Color>, ImageError> {
        Ok(self.iter_colors().collect())
    }
}

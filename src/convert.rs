//! End-to-end conversion: decoded pixels in, C artifacts out.

use crate::emit::{self, Bitmap, CArtifacts, EmitError, Layout, PixelFormat};
use crate::models::{Image, ImageError, IndexedImage, Palette, PixelBuffer};
use crate::tiles;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Error type for a conversion run
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to decode '{path}': {source}")]
    Decode { path: String, source: image::ImageError },
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// Options for one conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub format: PixelFormat,
    pub layout: Layout,
    pub palette_row: u32,
    /// Palette for indexed output. When absent, one is built from the image.
    pub palette: Option<Arc<Palette>>,
    /// Base name override; defaults to the file name minus its extension.
    pub name: Option<String>,
}

/// Machine-readable description of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    pub file: String,
    pub base_name: String,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub layout: Layout,
    pub palette_colors: Option<usize>,
    pub tiles: Option<usize>,
}

/// Result of [`convert_buffer`].
#[derive(Debug, Clone)]
pub struct Conversion {
    pub artifacts: CArtifacts,
    pub summary: ConversionSummary,
}

/// Decode an image file into a [`PixelBuffer`] named after the file.
pub fn load_image(path: &Path) -> Result<PixelBuffer, ConvertError> {
    let decoded = image::open(path)
        .map_err(|source| ConvertError::Decode { path: path.display().to_string(), source })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(PixelBuffer::from_rgba_image(file_name, decoded.to_rgba8())?)
}

/// Convert a decoded buffer into `.c`/`.h` text.
pub fn convert_buffer(buffer: &PixelBuffer, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let indexed = match options.format {
        PixelFormat::Direct => None,
        PixelFormat::Indexed4 => {
            let palette = match &options.palette {
                Some(palette) => Arc::clone(palette),
                None => Arc::new(Palette::from_pixels(buffer)?),
            };
            Some(IndexedImage::from_pixel_buffer(buffer, palette, options.palette_row)?)
        }
    };

    let bitmap = match &indexed {
        Some(image) => Bitmap::Indexed(image),
        None => Bitmap::Direct(buffer),
    };

    let artifacts = match &options.name {
        Some(name) => emit::emit_named(bitmap, name, options.layout)?,
        None => emit::emit_artifacts(bitmap, options.layout)?,
    };

    let dimensions = buffer.dimensions();
    let summary = ConversionSummary {
        file: buffer.file_name().to_string(),
        base_name: artifacts.base_name.clone(),
        width: dimensions.width(),
        height: dimensions.height(),
        format: options.format,
        layout: options.layout,
        palette_colors: bitmap.palette().map(Palette::len),
        tiles: tiles::tile_count(dimensions).ok(),
    };

    Ok(Conversion { artifacts, summary })
}

//! C source and header emission.
//!
//! Turns a direct or palette-indexed bitmap into the `.c` / `.h` pair a
//! handheld toolchain links against:
//!
//! - **Direct** (3-channel): every pixel becomes a packed 15-bit BGR value.
//! - **Indexed4** (4-bit palette-indexed): four palette indices per 16-bit
//!   value, plus the packed palette itself.
//!
//! Either format can be laid out as a plain row-major bitmap or tile by tile
//! for sprite hardware.
//!
//! # Example
//!
//! ```
//! use spritec::color::Color;
//! use spritec::emit::{emit_artifacts, Bitmap, Layout};
//! use spritec::models::{Dimensions, PixelBuffer};
//!
//! let dims = Dimensions::new(16, 16).unwrap();
//! let buffer = PixelBuffer::filled("hero.png", dims, Color::WHITE);
//! let artifacts = emit_artifacts(Bitmap::Direct(&buffer), Layout::Bitmap).unwrap();
//!
//! assert_eq!(artifacts.base_name, "hero");
//! assert!(artifacts.source.starts_with("const unsigned short heroBitmap[256]"));
//! assert!(artifacts.header.starts_with("#ifndef HERO_H"));
//! ```

mod header;
mod source;

pub use header::render_header;
pub use source::{render_array, render_source};

use crate::color::Color;
use crate::models::{Image, ImageCoordinates, ImageError, IndexedImage, Palette, PixelBuffer};
use crate::pack::pack_bgr15;
use crate::tiles::{self, TileError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for emission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Tile(#[from] TileError),
}

/// Pixel format of the emitted payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// Packed 15-bit colors, one per pixel
    #[default]
    Direct,
    /// 4-bit palette indices, four per value
    Indexed4,
}

impl PixelFormat {
    pub fn name(&self) -> &'static str {
        match self {
            PixelFormat::Direct => "direct",
            PixelFormat::Indexed4 => "indexed4",
        }
    }
}

/// Order in which pixels are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Row-major over the whole image
    #[default]
    Bitmap,
    /// 8x8 tiles in raster order, row-major within each tile
    Tiled,
}

/// A bitmap ready for emission, tagged with its pixel format.
#[derive(Debug, Clone, Copy)]
pub enum Bitmap<'a> {
    Direct(&'a PixelBuffer),
    Indexed(&'a IndexedImage),
}

impl<'a> Bitmap<'a> {
    pub fn format(&self) -> PixelFormat {
        match self {
            Bitmap::Direct(_) => PixelFormat::Direct,
            Bitmap::Indexed(_) => PixelFormat::Indexed4,
        }
    }

    pub fn image(&self) -> &'a dyn Image {
        match self {
            Bitmap::Direct(buffer) => *buffer,
            Bitmap::Indexed(indexed) => *indexed,
        }
    }

    /// Palette emitted alongside the pixels, if the format has one.
    pub fn palette(&self) -> Option<&'a Palette> {
        match self {
            Bitmap::Direct(_) => None,
            Bitmap::Indexed(indexed) => Some(&**indexed.palette()),
        }
    }
}

/// The generated `.c` and `.h` text for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CArtifacts {
    pub base_name: String,
    pub source: String,
    pub header: String,
}

/// Strip the final extension from a file name.
///
/// A name without a `.` (or whose only `.` is a leading one, as in
/// `.sprite`) is used unchanged.
///
/// ```
/// use spritec::emit::base_name;
///
/// assert_eq!(base_name("foo.png"), "foo");
/// assert_eq!(base_name("foo.tar.gz"), "foo.tar");
/// assert_eq!(base_name("foo"), "foo");
/// ```
pub fn base_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(i) if i > 0 => &file_name[..i],
        _ => file_name,
    }
}

/// Whether `name` is usable as a C identifier prefix: `[A-Za-z_][A-Za-z0-9_]*`.
///
/// ```
/// use spritec::emit::is_c_identifier;
///
/// assert!(is_c_identifier("hero_01"));
/// assert!(!is_c_identifier("my.sprite"));
/// ```
pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Render both artifacts for `bitmap`, named after its file name.
pub fn emit_artifacts(bitmap: Bitmap<'_>, layout: Layout) -> Result<CArtifacts, EmitError> {
    let name = base_name(bitmap.image().file_name()).to_string();
    emit_named(bitmap, &name, layout)
}

/// Render both artifacts under an explicit base name.
pub fn emit_named(bitmap: Bitmap<'_>, name: &str, layout: Layout) -> Result<CArtifacts, EmitError> {
    if !is_c_identifier(name) {
        log::warn!("'{}' is not a valid C identifier; the generated symbols will not compile", name);
    }
    let values = pixel_values(bitmap, layout)?;
    let palette = bitmap.palette().map(palette_values);
    log::debug!(
        "emitting '{}' as {} ({:?}): {} values, {} palette entries",
        name,
        bitmap.format().name(),
        layout,
        values.len(),
        palette.as_ref().map_or(0, Vec::len)
    );

    Ok(CArtifacts {
        base_name: name.to_string(),
        source: render_source(name, &values, palette.as_deref()),
        header: render_header(name, bitmap.image().dimensions(), bitmap.palette().map(Palette::len)),
    })
}

/// The numeric payload of the bitmap array.
pub fn pixel_values(bitmap: Bitmap<'_>, layout: Layout) -> Result<Vec<u16>, EmitError> {
    match bitmap {
        Bitmap::Direct(buffer) => {
            let colors: Vec<Color> = match layout {
                Layout::Bitmap => buffer.iter_colors().collect(),
                Layout::Tiled => tiles::decompose(buffer)?
                    .into_iter()
                    .flat_map(|tile| tile.pixels.into_iter().flatten())
                    .collect(),
            };
            Ok(colors.into_iter().map(pack_bgr15).collect())
        }
        Bitmap::Indexed(indexed) => {
            let indices = match layout {
                Layout::Bitmap => indexed.indices().to_vec(),
                Layout::Tiled => tiled_indices(indexed)?,
            };
            Ok(pack_nibbles(&indices))
        }
    }
}

/// Palette indices reordered tile by tile.
fn tiled_indices(indexed: &IndexedImage) -> Result<Vec<u8>, EmitError> {
    let mut out = Vec::with_capacity(indexed.indices().len());
    for origin in tiles::tile_origins(indexed.dimensions())? {
        for dy in 0..tiles::TILE_SIZE {
            for dx in 0..tiles::TILE_SIZE {
                let pos = ImageCoordinates::new(origin.x + dx, origin.y + dy);
                out.push(indexed.index_at(pos)?);
            }
        }
    }
    Ok(out)
}

/// Pack 4-bit indices four to a halfword, first index in the lowest nibble.
/// A trailing partial group is zero-padded.
pub fn pack_nibbles(indices: &[u8]) -> Vec<u16> {
    indices
        .chunks(4)
        .map(|group| {
            group
                .iter()
                .enumerate()
                .fold(0u16, |acc, (i, &index)| acc | (((index & 0xF) as u16) << (i * 4)))
        })
        .collect()
}

/// Every palette color packed to 15 bits, in palette order.
pub fn palette_values(palette: &Palette) -> Vec<u16> {
    palette.colors().iter().copied().map(pack_bgr15).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dimensions;
    use std::sync::Arc;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("foo.png"), "foo");
        assert_eq!(base_name("my.sprite.bmp"), "my.sprite");
        assert_eq!(base_name("noext"), "noext");
        assert_eq!(base_name(".hidden"), ".hidden");
        assert_eq!(base_name("trailing."), "trailing");
    }

    #[test]
    fn test_is_c_identifier() {
        assert!(is_c_identifier("foo"));
        assert!(is_c_identifier("_tile8"));
        assert!(!is_c_identifier("my.sprite"));
        assert!(!is_c_identifier("8bit"));
        assert!(!is_c_identifier("hero-run"));
        assert!(!is_c_identifier(""));
    }

    #[test]
    fn test_emit_keeps_non_identifier_names() {
        let buffer = PixelBuffer::filled("my.sprite.png", Dimensions::new(8, 8).unwrap(), Color::BLACK);
        let artifacts = emit_artifacts(Bitmap::Direct(&buffer), Layout::Bitmap).unwrap();
        assert_eq!(artifacts.base_name, "my.sprite");
        assert!(artifacts.source.starts_with("const unsigned short my.spriteBitmap[256]"));
    }

    #[test]
    fn test_pack_nibbles_low_first() {
        assert_eq!(pack_nibbles(&[1, 2, 3, 4]), vec![0x4321]);
        assert_eq!(pack_nibbles(&[15, 0, 0, 15, 7]), vec![0xF00F, 0x0007]);
        assert!(pack_nibbles(&[]).is_empty());
    }

    #[test]
    fn test_direct_values_row_major() {
        let dims = Dimensions::new(2, 1).unwrap();
        let buffer = PixelBuffer::new("a.png", dims, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
        assert_eq!(pixel_values(Bitmap::Direct(&buffer), Layout::Bitmap).unwrap(), vec![0x001F, 0x7C00]);
    }

    #[test]
    fn test_direct_tiled_reorders() {
        // left tile white, right tile black
        let dims = Dimensions::new(16, 8).unwrap();
        let mut data = Vec::new();
        for _y in 0..8 {
            for x in 0..16 {
                let v = if x < 8 { 255 } else { 0 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let buffer = PixelBuffer::new("t.png", dims, data).unwrap();
        let values = pixel_values(Bitmap::Direct(&buffer), Layout::Tiled).unwrap();
        assert_eq!(values.len(), 128);
        assert!(values[..64].iter().all(|&v| v == 0x7FFF));
        assert!(values[64..].iter().all(|&v| v == 0x0000));

        let row_major = pixel_values(Bitmap::Direct(&buffer), Layout::Bitmap).unwrap();
        assert_eq!(row_major[8], 0x0000);
    }

    #[test]
    fn test_tiled_requires_multiple_of_eight() {
        let dims = Dimensions::new(10, 8).unwrap();
        let buffer = PixelBuffer::filled("odd.png", dims, Color::WHITE);
        assert!(matches!(
            pixel_values(Bitmap::Direct(&buffer), Layout::Tiled),
            Err(EmitError::Tile(TileError::DimensionMismatch(_)))
        ));
    }

    #[test]
    fn test_indexed_values_and_palette() {
        let palette = Arc::new(Palette::new(vec![Color::BLACK, Color::WHITE]).unwrap());
        let dims = Dimensions::new(4, 2).unwrap();
        let img = IndexedImage::new("i.png", dims, vec![0, 1, 1, 0, 1, 1, 1, 1], palette, 0).unwrap();
        let bitmap = Bitmap::Indexed(&img);
        assert_eq!(bitmap.format(), PixelFormat::Indexed4);
        assert_eq!(pixel_values(bitmap, Layout::Bitmap).unwrap(), vec![0x0110, 0x1111]);
        assert_eq!(palette_values(bitmap.palette().unwrap()), vec![0x0000, 0x7FFF]);
    }

    #[test]
    fn test_indexed_tiled_order() {
        let palette = Arc::new(Palette::new((0..16).map(|i| Color::rgb(i, i, i)).collect()).unwrap());
        let dims = Dimensions::new(16, 8).unwrap();
        let indices: Vec<u8> = (0..128).map(|i| if i % 16 < 8 { 1 } else { 2 }).collect();
        let img = IndexedImage::new("i.png", dims, indices, palette, 0).unwrap();
        let values = pixel_values(Bitmap::Indexed(&img), Layout::Tiled).unwrap();
        assert_eq!(values.len(), 32);
        assert!(values[..16].iter().all(|&v| v == 0x1111));
        assert!(values[16..].iter().all(|&v| v == 0x2222));
    }

    #[test]
    fn test_emit_artifacts_names() {
        let dims = Dimensions::new(8, 8).unwrap();
        let buffer = PixelBuffer::filled("foo.png", dims, Color::BLACK);
        let artifacts = emit_artifacts(Bitmap::Direct(&buffer), Layout::Bitmap).unwrap();
        assert_eq!(artifacts.base_name, "foo");
        assert!(artifacts.header.contains("#define FOO_H"));
        assert!(artifacts.source.contains("fooBitmap"));

        let renamed = emit_named(Bitmap::Direct(&buffer), "bar", Layout::Bitmap).unwrap();
        assert!(renamed.header.contains("#define barTilesLen 64"));
    }

    #[test]
    fn test_format_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: PixelFormat,
            layout: Layout,
        }
        let w: Wrapper = toml::from_str("format = \"indexed4\"\nlayout = \"tiled\"").unwrap();
        assert_eq!(w.format, PixelFormat::Indexed4);
        assert_eq!(w.layout, Layout::Tiled);
    }
}

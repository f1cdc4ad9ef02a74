//! Artifact output and binary image passthrough

use crate::emit::CArtifacts;
use crate::models::{Image, PixelBuffer};
use image::{DynamicImage, ImageOutputFormat};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

/// JPEG quality used for passthrough encoding.
const JPEG_QUALITY: u8 = 90;

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
    /// Output path has no recognised image extension
    UnknownFormat(PathBuf),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
            OutputError::UnknownFormat(p) => {
                write!(f, "cannot infer image format from '{}' (use .png, .jpg or .jpeg)", p.display())
            }
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
            OutputError::UnknownFormat(_) => None,
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

/// Binary container for passthrough export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeFormat {
    Png,
    Jpeg,
}

impl EncodeFormat {
    /// Pick a format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(EncodeFormat::Png),
            "jpg" | "jpeg" => Some(EncodeFormat::Jpeg),
            _ => None,
        }
    }
}

/// Paths of the `.c` and `.h` files for `base_name` inside `out_dir`.
pub fn artifact_paths(out_dir: &Path, base_name: &str) -> (PathBuf, PathBuf) {
    (out_dir.join(format!("{}.c", base_name)), out_dir.join(format!("{}.h", base_name)))
}

fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write both artifacts into `out_dir`, creating it if needed.
///
/// Returns the `.c` and `.h` paths written.
pub fn write_artifacts(artifacts: &CArtifacts, out_dir: &Path) -> Result<(PathBuf, PathBuf), OutputError> {
    let (source_path, header_path) = artifact_paths(out_dir, &artifacts.base_name);
    ensure_parent(&source_path)?;
    std::fs::write(&source_path, &artifacts.source)?;
    std::fs::write(&header_path, &artifacts.header)?;
    log::debug!("wrote {} and {}", source_path.display(), header_path.display());
    Ok((source_path, header_path))
}

/// Encode the buffer's pixels, unchanged, into a PNG or JPEG container.
///
/// JPEG has no alpha channel, so alpha is dropped for that format.
pub fn encode_image(buffer: &PixelBuffer, format: EncodeFormat) -> Result<Vec<u8>, OutputError> {
    let rgba = DynamicImage::ImageRgba8(buffer.to_rgba_image());
    let mut bytes = Cursor::new(Vec::new());
    match format {
        EncodeFormat::Png => rgba.write_to(&mut bytes, ImageOutputFormat::Png)?,
        EncodeFormat::Jpeg => DynamicImage::ImageRgb8(rgba.to_rgb8())
            .write_to(&mut bytes, ImageOutputFormat::Jpeg(JPEG_QUALITY))?,
    }
    log::debug!("encoded '{}' as {:?}", buffer.file_name(), format);
    Ok(bytes.into_inner())
}

/// Encode the buffer into `path`, choosing the container from the extension.
pub fn save_encoded(buffer: &PixelBuffer, path: &Path) -> Result<(), OutputError> {
    let format = EncodeFormat::from_path(path).ok_or_else(|| OutputError::UnknownFormat(path.to_path_buf()))?;
    let bytes = encode_image(buffer, format)?;
    ensure_parent(path)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

//! Configuration schema types for `spritec.toml`

use crate::color::parse_color;
use crate::emit::{Layout, PixelFormat};
use crate::models::{Palette, MAX_PALETTE_ROWS, PALETTE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required)
    pub name: String,
    /// Directory scanned for source images by `spritec build`
    #[serde(default = "default_src")]
    pub src: PathBuf,
    /// Directory generated `.c`/`.h` files are written to
    #[serde(default = "default_out")]
    pub out: PathBuf,
}

fn default_src() -> PathBuf {
    PathBuf::from("assets")
}

fn default_out() -> PathBuf {
    PathBuf::from("build")
}

/// How images are turned into C arrays
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmitConfig {
    #[serde(default)]
    pub format: PixelFormat,
    #[serde(default)]
    pub layout: Layout,
    /// 16-color band indexed images draw from
    #[serde(default)]
    pub palette_row: u32,
}

/// Shared palette for indexed output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// CSS color strings, 16 per row
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Root configuration structure for `spritec.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpritecConfig {
    pub project: ProjectConfig,
    #[serde(default)]
    pub emit: EmitConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "palette.colors[3]")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "spritec.toml: '{}' {}", self.field, self.message)
    }
}

impl SpritecConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.project.name.is_empty() {
            errors.push(ConfigValidationError {
                field: "project.name".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        if self.emit.palette_row as usize >= MAX_PALETTE_ROWS {
            errors.push(ConfigValidationError {
                field: "emit.palette_row".to_string(),
                message: format!("must be between 0 and 15, got {}", self.emit.palette_row),
            });
        }

        for (i, color) in self.palette.colors.iter().enumerate() {
            if let Err(e) = parse_color(color) {
                errors.push(ConfigValidationError {
                    field: format!("palette.colors[{}]", i),
                    message: format!("is not a valid color: {}", e),
                });
            }
        }

        let len = self.palette.colors.len();
        if len > PALETTE_SIZE * MAX_PALETTE_ROWS {
            errors.push(ConfigValidationError {
                field: "palette.colors".to_string(),
                message: format!("holds at most 256 colors, got {}", len),
            });
        } else if len > 0 && self.emit.palette_row as usize * PALETTE_SIZE >= len {
            errors.push(ConfigValidationError {
                field: "emit.palette_row".to_string(),
                message: format!("row {} is past the end of a {}-color palette", self.emit.palette_row, len),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// The configured palette, or `None` when no colors are listed.
    pub fn palette(&self) -> Result<Option<Palette>, ConfigValidationError> {
        if self.palette.colors.is_empty() {
            return Ok(None);
        }

        let mut colors = Vec::with_capacity(self.palette.colors.len());
        for (i, color) in self.palette.colors.iter().enumerate() {
            colors.push(parse_color(color).map_err(|e| ConfigValidationError {
                field: format!("palette.colors[{}]", i),
                message: format!("is not a valid color: {}", e),
            })?);
        }

        Palette::new(colors).map(Some).map_err(|e| ConfigValidationError {
            field: "palette.colors".to_string(),
            message: e.to_string(),
        })
    }
}

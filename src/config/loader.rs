//! Configuration loading and discovery for `spritec.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{EmitConfig, PaletteConfig, ProjectConfig, SpritecConfig};
use crate::emit::{Layout, PixelFormat};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "spritec.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse spritec.toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub out: Option<PathBuf>,
    pub src: Option<PathBuf>,
    pub format: Option<PixelFormat>,
    pub layout: Option<Layout>,
    pub palette_row: Option<u32>,
}

/// Find spritec.toml by walking up from the current working directory,
/// falling back to `$XDG_CONFIG_HOME/spritec/spritec.toml`.
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Checks XDG_CONFIG_HOME/spritec/spritec.toml or ~/.config/spritec/spritec.toml
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("spritec").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find spritec.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from `path`, or from the discovered spritec.toml, or
/// fall back to defaults when there is none.
pub fn load_config(path: Option<&Path>) -> Result<SpritecConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(default_config()),
    }
}

fn load_config_file(path: &Path) -> Result<SpritecConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: SpritecConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Default configuration, named after the current directory.
pub fn default_config() -> SpritecConfig {
    let project_name = env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unnamed".to_string());

    SpritecConfig {
        project: ProjectConfig {
            name: project_name,
            src: PathBuf::from("assets"),
            out: PathBuf::from("build"),
        },
        emit: EmitConfig::default(),
        palette: PaletteConfig::default(),
    }
}

/// Merge CLI overrides into a configuration. CLI arguments win.
pub fn merge_cli_overrides(config: &mut SpritecConfig, overrides: &CliOverrides) {
    if let Some(ref out) = overrides.out {
        config.project.out = out.clone();
    }
    if let Some(ref src) = overrides.src {
        config.project.src = src.clone();
    }
    if let Some(format) = overrides.format {
        config.emit.format = format;
    }
    if let Some(layout) = overrides.layout {
        config.emit.layout = layout;
    }
    if let Some(row) = overrides.palette_row {
        config.emit.palette_row = row;
    }
}

/// Get the project root directory from a config file path.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root (the config file's directory).
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

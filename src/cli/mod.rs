//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod build;
mod convert;
mod encode;
mod info;

use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{self, SpritecConfig};
use crate::emit::{self, Layout, PixelFormat};
use crate::output::artifact_paths;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// spritec - turn sprite images into C arrays for handheld targets
#[derive(Parser)]
#[command(name = "spritec")]
#[command(about = "spritec - convert sprite images into C source/header pairs")]
#[command(version)]
pub struct Cli {
    /// Print debug diagnostics (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert images into <name>.c / <name>.h pairs
    Convert {
        /// Input images (PNG, BMP, ...)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (default: next to each input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pixel format of the emitted array
        #[arg(long, value_enum)]
        format: Option<PixelFormat>,

        /// Pixel order: row-major bitmap or 8x8 tiles
        #[arg(long, value_enum)]
        layout: Option<Layout>,

        /// Palette row (0-15) for indexed output
        #[arg(long)]
        palette_row: Option<u32>,

        /// Base name for the generated symbols (single input only)
        #[arg(short, long)]
        name: Option<String>,

        /// Path to spritec.toml (default: search upward from cwd)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print a JSON summary instead of text
        #[arg(long)]
        json: bool,
    },

    /// Re-encode an image as PNG or JPEG without modifying its pixels
    Encode {
        /// Input image
        input: PathBuf,

        /// Output file; the extension (.png, .jpg, .jpeg) picks the container
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Convert every image under the project source directory
    Build {
        /// Override output directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Override source directory
        #[arg(long)]
        src: Option<PathBuf>,

        /// Path to spritec.toml (default: search upward from cwd)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Show what would be built without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show dimensions, tile count and colors of an image
    Info {
        /// Input image
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert { inputs, output, format, layout, palette_row, name, config, json } => {
            convert::run_convert(
                &inputs,
                output.as_deref(),
                format,
                layout,
                palette_row,
                name.as_deref(),
                config.as_deref(),
                json,
            )
        }
        Commands::Encode { input, output } => encode::run_encode(&input, &output),
        Commands::Build { out, src, config, dry_run } => {
            build::run_build(out.as_deref(), src.as_deref(), config.as_deref(), dry_run)
        }
        Commands::Info { input, json } => info::run_info(&input, json),
    }
}

/// Route `log` output to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

/// Load spritec.toml (explicit path or discovered) and return it with the
/// directory relative paths resolve against.
pub(crate) fn load_project_config(explicit: Option<&Path>) -> Result<(SpritecConfig, PathBuf), config::ConfigError> {
    let cwd = std::env::current_dir().unwrap_or_default();
    let config_path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => config::find_config(),
    };

    match config_path {
        Some(path) => {
            let cfg = config::load_config(Some(&path))?;
            let root = config::project_root(&path).map(Path::to_path_buf).unwrap_or(cwd);
            Ok((cfg, root))
        }
        None => {
            log::debug!("no spritec.toml found, using defaults");
            Ok((config::default_config(), cwd))
        }
    }
}

/// One source image and the directory its `.c`/`.h` pair is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Target {
    pub source: PathBuf,
    pub out_dir: PathBuf,
}

/// Base name a source's artifacts are written under.
pub(crate) fn target_name(source: &Path, name: Option<&str>) -> String {
    match name {
        Some(name) => name.to_string(),
        None => {
            let file_name = source.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            emit::base_name(&file_name).to_string()
        }
    }
}

/// Split `targets` into those with a unique destination and, per `.c` path
/// claimed more than once, the sources that would overwrite each other.
pub(crate) fn split_collisions(
    targets: Vec<Target>,
    name: Option<&str>,
) -> (Vec<Target>, Vec<(PathBuf, Vec<PathBuf>)>) {
    let mut by_path: BTreeMap<PathBuf, Vec<Target>> = BTreeMap::new();
    for target in targets {
        let (source_path, _) = artifact_paths(&target.out_dir, &target_name(&target.source, name));
        by_path.entry(source_path).or_default().push(target);
    }

    let mut unique = Vec::new();
    let mut collisions = Vec::new();
    for (path, mut group) in by_path {
        if group.len() == 1 {
            unique.extend(group.pop());
        } else {
            collisions.push((path, group.into_iter().map(|t| t.source).collect()));
        }
    }
    (unique, collisions)
}

/// Print one error per collision; returns the number of sources skipped.
pub(crate) fn report_collisions(collisions: &[(PathBuf, Vec<PathBuf>)]) -> usize {
    let mut skipped = 0;
    for (path, sources) in collisions {
        let names: Vec<String> = sources.iter().map(|s| s.display().to_string()).collect();
        eprintln!("Error: {} would be written by more than one source: {}", path.display(), names.join(", "));
        skipped += sources.len();
    }
    skipped
}

//! Build command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use glob::glob;
use rayon::prelude::*;

use crate::config::{merge_cli_overrides, resolve_path, CliOverrides};
use crate::convert::{convert_buffer, load_image, ConvertOptions};
use crate::output::write_artifacts;

use super::{load_project_config, report_collisions, split_collisions, Target, EXIT_ERROR, EXIT_SUCCESS};

/// Image extensions picked up under the source directory.
const SOURCE_EXTENSIONS: &[&str] = &["png", "bmp", "gif"];

/// Collect source images under `src_dir`, sorted for stable output.
fn discover_images(src_dir: &Path) -> Vec<PathBuf> {
    let dir_str = src_dir.to_string_lossy();
    let mut files = Vec::new();
    for ext in SOURCE_EXTENSIONS {
        match glob(&format!("{}/**/*.{}", dir_str, ext)) {
            Ok(paths) => files.extend(paths.flatten()),
            Err(e) => log::warn!("invalid source pattern for {}: {}", src_dir.display(), e),
        }
    }
    files.sort();
    files
}

/// Output directory for one source, mirroring its place under `src_dir`.
fn target_dir(src_dir: &Path, out_dir: &Path, source: &Path) -> PathBuf {
    source
        .parent()
        .and_then(|parent| parent.strip_prefix(src_dir).ok())
        .map(|rel| out_dir.join(rel))
        .unwrap_or_else(|| out_dir.to_path_buf())
}

/// Run the build command
pub fn run_build(out: Option<&Path>, src: Option<&Path>, config: Option<&Path>, dry_run: bool) -> ExitCode {
    let (mut config, project_root) = match load_project_config(config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let overrides = CliOverrides {
        out: out.map(|p| p.to_path_buf()),
        src: src.map(|p| p.to_path_buf()),
        ..Default::default()
    };
    merge_cli_overrides(&mut config, &overrides);

    let src_dir = resolve_path(&project_root, &config.project.src);
    let out_dir = resolve_path(&project_root, &config.project.out);

    if !src_dir.exists() {
        eprintln!("Error: Source directory not found: {}", src_dir.display());
        eprintln!("Create the directory or specify a different path with --src");
        return ExitCode::from(EXIT_ERROR);
    }

    let sources = discover_images(&src_dir);

    if dry_run {
        println!("Dry run - would build:");
        println!("  Source: {}", src_dir.display());
        println!("  Output: {}", out_dir.display());
        println!("  Images: {}", sources.len());
        for source in &sources {
            println!("    - {}", source.display());
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    let palette = match config.palette() {
        Ok(palette) => palette.map(Arc::new),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let options = ConvertOptions {
        format: config.emit.format,
        layout: config.emit.layout,
        palette_row: config.emit.palette_row,
        palette,
        name: None,
    };

    log::info!("building {} image(s) from {}", sources.len(), src_dir.display());

    let targets = sources
        .iter()
        .map(|source| Target { source: source.clone(), out_dir: target_dir(&src_dir, &out_dir, source) })
        .collect();
    // sources sharing a stem in one directory would race for the same files
    let (targets, collisions) = split_collisions(targets, None);
    let skipped = report_collisions(&collisions);

    let failures: Vec<String> = targets
        .par_iter()
        .filter_map(|target| {
            build_one(&target.source, &target.out_dir, &options)
                .err()
                .map(|e| format!("{}: {}", target.source.display(), e))
        })
        .collect();

    for failure in &failures {
        eprintln!("Error: {}", failure);
    }

    let built = targets.len() - failures.len();
    let failed = failures.len() + skipped;
    if failed == 0 {
        println!("Built {} image(s) into {}", built, out_dir.display());
        ExitCode::from(EXIT_SUCCESS)
    } else {
        eprintln!("Built {} image(s), {} failed", built, failed);
        ExitCode::from(EXIT_ERROR)
    }
}

fn build_one(source: &Path, out_dir: &Path, options: &ConvertOptions) -> Result<(), String> {
    let buffer = load_image(source).map_err(|e| e.to_string())?;
    let conversion = convert_buffer(&buffer, options).map_err(|e| e.to_string())?;
    write_artifacts(&conversion.artifacts, out_dir).map_err(|e| e.to_string())?;
    log::debug!("built {}", conversion.summary.base_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_images_recurses_and_sorts() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("ui");
        fs::create_dir_all(&nested).unwrap();
        for path in [temp.path().join("b.png"), temp.path().join("a.bmp"), nested.join("c.png")] {
            fs::write(path, b"").unwrap();
        }
        fs::write(temp.path().join("notes.txt"), b"").unwrap();

        let found = discover_images(temp.path());
        assert_eq!(found.len(), 3);
        assert!(found.windows(2).all(|w| w[0] <= w[1]));
        assert!(found.iter().all(|p| p.extension().is_some_and(|e| e != "txt")));
    }

    #[test]
    fn test_target_dir_mirrors_subdirectories() {
        let src = Path::new("/proj/assets");
        let out = Path::new("/proj/build");
        assert_eq!(target_dir(src, out, Path::new("/proj/assets/hero.png")), PathBuf::from("/proj/build"));
        assert_eq!(
            target_dir(src, out, Path::new("/proj/assets/ui/icon.png")),
            PathBuf::from("/proj/build/ui")
        );
    }
}

//! Convert command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::config::{merge_cli_overrides, CliOverrides, SpritecConfig};
use crate::convert::{convert_buffer, load_image, ConversionSummary, ConvertOptions};
use crate::emit::{Layout, PixelFormat};
use crate::output::write_artifacts;

use super::{
    load_project_config, report_collisions, split_collisions, Target, EXIT_ERROR, EXIT_INVALID_ARGS,
    EXIT_SUCCESS,
};

/// Execute the convert command
pub fn run_convert(
    inputs: &[PathBuf],
    output: Option<&Path>,
    format: Option<PixelFormat>,
    layout: Option<Layout>,
    palette_row: Option<u32>,
    name: Option<&str>,
    config: Option<&Path>,
    json: bool,
) -> ExitCode {
    if name.is_some() && inputs.len() > 1 {
        eprintln!("Error: --name can only be used with a single input");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let (mut config, _) = match load_project_config(config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let overrides = CliOverrides { format, layout, palette_row, ..Default::default() };
    merge_cli_overrides(&mut config, &overrides);

    if let Err(errors) = validate(&config) {
        for e in errors {
            eprintln!("Error: {}", e);
        }
        return ExitCode::from(EXIT_INVALID_ARGS);
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
        name: name.map(str::to_string),
    };

    let targets = inputs
        .iter()
        .map(|input| Target {
            source: input.clone(),
            out_dir: match output {
                Some(dir) => dir.to_path_buf(),
                None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
            },
        })
        .collect();
    let (mut targets, collisions) = split_collisions(targets, name);
    let mut failed = report_collisions(&collisions) > 0;

    // command-line order
    targets.sort_by_key(|t| inputs.iter().position(|i| *i == t.source));

    let mut summaries: Vec<ConversionSummary> = Vec::with_capacity(targets.len());

    for Target { source: input, out_dir } in &targets {
        log::debug!("converting {} into {}", input.display(), out_dir.display());

        match convert_one(input, out_dir, &options) {
            Ok(summary) => {
                if !json {
                    println!(
                        "{} -> {}.c, {}.h ({}x{}, {})",
                        input.display(),
                        summary.base_name,
                        summary.base_name,
                        summary.width,
                        summary.height,
                        summary.format.name()
                    );
                }
                summaries.push(summary);
            }
            Err(e) => {
                eprintln!("Error: {}: {}", input.display(), e);
                failed = true;
            }
        }
    }

    if json {
        match serde_json::to_string_pretty(&summaries) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: failed to serialize summary: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    if failed {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

fn validate(config: &SpritecConfig) -> Result<(), Vec<String>> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into_iter().map(|e| e.to_string()).collect())
    }
}

fn convert_one(
    input: &Path,
    out_dir: &Path,
    options: &ConvertOptions,
) -> Result<ConversionSummary, Box<dyn std::error::Error>> {
    let buffer = load_image(input)?;
    let conversion = convert_buffer(&buffer, options)?;
    write_artifacts(&conversion.artifacts, out_dir)?;
    Ok(conversion.summary)
}

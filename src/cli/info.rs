//! Info command implementation

use std::collections::HashSet;
use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;

use crate::convert::load_image;
use crate::models::{Image, PALETTE_SIZE};
use crate::tiles;

use super::{EXIT_ERROR, EXIT_SUCCESS};

#[derive(Debug, Serialize)]
struct ImageInfo {
    file: String,
    width: u32,
    height: u32,
    pixels: usize,
    tiles: Option<usize>,
    distinct_colors: usize,
    indexable: bool,
}

/// Execute the info command
pub fn run_info(input: &Path, json: bool) -> ExitCode {
    let buffer = match load_image(input) {
        Ok(buffer) => buffer,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let dimensions = buffer.dimensions();
    let distinct: HashSet<_> = buffer.iter_colors().collect();
    let info = ImageInfo {
        file: buffer.file_name().to_string(),
        width: dimensions.width(),
        height: dimensions.height(),
        pixels: dimensions.area(),
        tiles: tiles::tile_count(dimensions).ok(),
        distinct_colors: distinct.len(),
        indexable: distinct.len() <= PALETTE_SIZE,
    };

    if json {
        match serde_json::to_string_pretty(&info) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: failed to serialize info: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    println!("File:   {}", info.file);
    println!("Size:   {}", dimensions);
    match info.tiles {
        Some(n) => println!("Tiles:  {} (8x8)", n),
        None => println!("Tiles:  - (not a multiple of 8)"),
    }
    println!("Colors: {}", info.distinct_colors);
    if !info.indexable {
        println!("  too many colors for 4-bit indexed output (max {})", PALETTE_SIZE);
    }
    ExitCode::from(EXIT_SUCCESS)
}

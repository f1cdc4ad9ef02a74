//! Encode command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::convert::load_image;
use crate::output::{save_encoded, EncodeFormat};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the encode command
pub fn run_encode(input: &Path, output: &Path) -> ExitCode {
    if EncodeFormat::from_path(output).is_none() {
        eprintln!("Error: cannot infer image format from '{}'", output.display());
        eprintln!("Use a .png, .jpg or .jpeg extension");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let buffer = match load_image(input) {
        Ok(buffer) => buffer,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match save_encoded(&buffer, output) {
        Ok(()) => {
            println!("Saved: {}", output.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

//! spritec - command-line tool for turning sprite images into C arrays

use std::process::ExitCode;

use spritec::cli;

fn main() -> ExitCode {
    cli::run()
}

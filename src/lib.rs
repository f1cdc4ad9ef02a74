//! spritec - convert sprite bitmaps into C source/header pairs
//!
//! This library provides functionality to:
//! - Hold direct (RGBA) and 4-bit palette-indexed images
//! - Pack colors into the 15-bit BGR format of handheld targets
//! - Split images into 8x8 tiles for sprite hardware
//! - Emit `.c` arrays and matching `.h` declarations

pub mod cli;
pub mod color;
pub mod config;
pub mod convert;
pub mod emit;
pub mod models;
pub mod output;
pub mod pack;
pub mod tiles;

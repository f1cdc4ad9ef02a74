//! Configuration module
//!
//! Provides types and parsing for `spritec.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;

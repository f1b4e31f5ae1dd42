//! recolor - swap reference colors in a folder of PNG images.
//!
//! This library exposes modules for integration testing.

pub mod batch;
pub mod colorize;
pub mod colors;
pub mod config;
pub mod constants;
pub mod error;
pub mod types;
pub mod utils;

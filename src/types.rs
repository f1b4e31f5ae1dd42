use crate::colorize::ColorMap;

use std::path::PathBuf;

use image::Rgb;

/// A single source → destination color substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMapping {
    pub src: Rgb<u8>,
    pub dst: Rgb<u8>,
}

impl ColorMapping {
    pub fn new(src: [u8; 3], dst: [u8; 3]) -> Self {
        ColorMapping {
            src: Rgb(src),
            dst: Rgb(dst),
        }
    }
}

#[derive(Debug)]
pub struct AppConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub color_map_name: String,
    pub color_map: ColorMap,
    pub threshold: f64,
    pub quiet: bool,
}

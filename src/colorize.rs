use crate::error::AppError;
use crate::types::ColorMapping;
use crate::utils::color_distance;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::io::Reader as ImageReader;
use image::{DynamicImage, Rgb, Rgba, RgbaImage};
use rayon::prelude::*;

/// Ordered list of substitutions; earlier entries take precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMap(Vec<ColorMapping>);

impl ColorMap {
    pub fn new(mappings: Vec<ColorMapping>) -> Self {
        ColorMap(mappings)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColorMapping> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First mapping whose source lies within `threshold` of `rgb`.
    pub fn first_match(&self, rgb: Rgb<u8>, threshold: f64) -> Option<&ColorMapping> {
        self.0
            .iter()
            .find(|mapping| color_distance(rgb, mapping.src) <= threshold)
    }
}

/// Replaces the RGB part of `pixel` with the destination of the first mapping in
/// range, keeping alpha. Pixels out of range of every mapping are returned as is.
///
/// Matching is first-in-list, not nearest: when two source colors both lie
/// within `threshold`, the one declared first wins even if the other is closer.
pub fn find_closest_color(pixel: Rgba<u8>, color_map: &ColorMap, threshold: f64) -> Rgba<u8> {
    let rgb = Rgb([pixel[0], pixel[1], pixel[2]]);
    match color_map.first_match(rgb, threshold) {
        Some(mapping) => Rgba([mapping.dst[0], mapping.dst[1], mapping.dst[2], pixel[3]]),
        None => pixel,
    }
}

pub fn colorize(img: &DynamicImage, color_map: &ColorMap, threshold: f64) -> RgbaImage {
    let mut output = img.to_rgba8();

    // Each pixel only reads the shared map, so row order doesn't matter.
    output.par_chunks_exact_mut(4).for_each(|px| {
        let pixel = Rgba([px[0], px[1], px[2], px[3]]);
        let mapped = find_closest_color(pixel, color_map, threshold);
        px.copy_from_slice(&mapped.0);
    });

    output
}

/// Decodes an image, sniffing the format from its contents rather than its name.
pub fn open_image(path: &Path) -> Result<DynamicImage, AppError> {
    let read_err = |source| AppError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_err)?;
    let reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(read_err)?;

    reader.decode().map_err(|source| AppError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

pub fn replace_colors_fuzzy(
    image_path: &Path,
    output_path: &Path,
    color_map: &ColorMap,
    threshold: f64,
) -> Result<(), AppError> {
    let img = open_image(image_path)?;
    let recolored = colorize(&img, color_map, threshold);
    recolored.save(output_path).map_err(|source| AppError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;
    Ok(())
}

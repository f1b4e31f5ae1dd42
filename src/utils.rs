use crate::error::AppError;

use std::str::FromStr;

use image::Rgb;
use palette::Srgb;

/// Parses `#rrggbb`, `rrggbb` or the short `#rgb` form.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb<u8>, AppError> {
    // palette slices by byte offset and panics inside multi-byte characters.
    if !hex.is_ascii() {
        return Err(AppError::InvalidColor {
            value: hex.to_string(),
            reason: "non-ASCII characters in hex color".to_string(),
        });
    }
    let color = Srgb::<u8>::from_str(hex.trim()).map_err(|e| AppError::InvalidColor {
        value: hex.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Rgb([color.red, color.green, color.blue]))
}

/// Euclidean distance between two colors in RGB space.
pub fn color_distance(c1: Rgb<u8>, c2: Rgb<u8>) -> f64 {
    c1.0.iter()
        .zip(c2.0.iter())
        .map(|(&a, &b)| {
            let d = a as f64 - b as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Parses a distance threshold, rejecting negative and non-finite values.
pub fn parse_threshold(value: &str) -> Result<f64, AppError> {
    match value.trim().parse::<f64>() {
        Ok(t) if t.is_finite() && t >= 0.0 => Ok(t),
        _ => Err(AppError::InvalidThreshold(value.to_string())),
    }
}

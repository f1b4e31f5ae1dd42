use crate::colorize::ColorMap;
use crate::colors;
use crate::constants::{
    CONFIG_DIR, CONFIG_FILE_NAME, DEFAULT_COLOR_MAP, DEFAULT_THRESHOLD, VERSION,
};
use crate::error::AppError;
use crate::types::{AppConfig, ColorMapping};
use crate::utils::{hex_to_rgb, parse_threshold};

use clap::{Arg, ArgMatches, Command};
use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use serde_derive::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct SerializedAppConfig {
    color_map: String,
    threshold: String,
}

#[derive(Debug, Deserialize)]
struct SerializedColorMapping {
    src: String,
    dst: String,
}

#[derive(Debug, Deserialize)]
struct SerializedColorMap {
    #[serde(default)]
    mappings: Vec<SerializedColorMapping>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from(""))
        .join(CONFIG_DIR)
}

fn load_config(
    config_dir: &Path,
    config_path: Option<&str>,
) -> Result<SerializedAppConfig, config::ConfigError> {
    let mut builder = ConfigBuilder::default();

    builder = builder
        .set_default("color_map", DEFAULT_COLOR_MAP)?
        .set_default("threshold", DEFAULT_THRESHOLD)?;

    let default_config_path = config_dir.join(CONFIG_FILE_NAME);

    if default_config_path.exists() {
        builder = ConfigBuilder::<DefaultState>::add_source(
            builder,
            File::from(default_config_path).required(false),
        );
    }

    if let Some(path) = config_path {
        builder = builder.add_source(File::with_name(path).required(true));
    }

    let config = builder.build()?;

    config.try_deserialize()
}

fn parse_mappings(pairs: &[(&str, &str)]) -> Result<Vec<ColorMapping>, AppError> {
    pairs
        .iter()
        .map(|&(src, dst)| {
            Ok(ColorMapping {
                src: hex_to_rgb(src)?,
                dst: hex_to_rgb(dst)?,
            })
        })
        .collect()
}

/// Resolves a color map by name: `<config_dir>/<name>.toml` first, then the
/// built-in maps.
pub fn load_color_map(name: &str, config_dir: &Path) -> Result<ColorMap, AppError> {
    let color_map_path = config_dir.join(format!("{}.toml", name));
    if color_map_path.exists() {
        let color_map_str = fs::read_to_string(&color_map_path).map_err(|source| {
            AppError::Read {
                path: color_map_path.clone(),
                source,
            }
        })?;
        let color_map: SerializedColorMap =
            toml::from_str(&color_map_str).map_err(|e| AppError::ColorMapFile {
                path: color_map_path.clone(),
                reason: e.to_string(),
            })?;
        let pairs: Vec<(&str, &str)> = color_map
            .mappings
            .iter()
            .map(|m| (m.src.as_str(), m.dst.as_str()))
            .collect();
        Ok(ColorMap::new(parse_mappings(&pairs)?))
    } else if let Some(pairs) = colors::builtin(name) {
        Ok(ColorMap::new(parse_mappings(pairs)?))
    } else {
        Err(AppError::UnknownColorMap(name.to_string()))
    }
}

pub fn build_cli() -> Command<'static> {
    Command::new("recolor")
        .version(VERSION)
        .about("Replaces reference colors in every PNG of a folder")
        .after_help("Each pixel whose RGB value lies within THRESHOLD (Euclidean distance) of a source color takes that mapping's destination color; alpha is kept. When several source colors are in range, the first one listed in the color map wins.\n\nColor maps are TOML files in ~/.config/recolor named <NAME>.toml, holding [[mappings]] tables with hex 'src' and 'dst' strings. The built-in 'railjet' map is used when no file overrides it.")
        .arg(
            Arg::new("Threshold")
                .short('t')
                .long("threshold")
                .value_name("DISTANCE")
                .help("Overrides the match distance set in config")
                .takes_value(true),
        )
        .arg(
            Arg::new("Color Map")
                .short('m')
                .long("color-map")
                .value_name("NAME")
                .help("Overrides the color map set in config")
                .takes_value(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("/path/to/config.toml")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Hides the progress bar"),
        )
        .arg(
            Arg::new("Input Dir")
                .help("Folder holding the PNG images to recolor")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("Output Dir")
                .help("Folder to write recolored images to, created if missing")
                .required(true)
                .index(2),
        )
}

pub fn config_from_matches(matches: &ArgMatches, config_dir: &Path) -> Result<AppConfig, AppError> {
    let config = load_config(config_dir, matches.value_of("config"))?;

    // Both positionals are required, clap rejects the invocation without them.
    let input_dir = PathBuf::from(matches.value_of("Input Dir").unwrap_or_default());
    let output_dir = PathBuf::from(matches.value_of("Output Dir").unwrap_or_default());

    let color_map_name = matches
        .value_of("Color Map")
        .unwrap_or(&config.color_map)
        .to_string();

    let threshold = matches
        .value_of("Threshold")
        .unwrap_or(&config.threshold);
    let threshold = parse_threshold(threshold)?;

    let color_map = load_color_map(&color_map_name, config_dir)?;
    if color_map.is_empty() {
        tracing::warn!(color_map = %color_map_name, "color map has no mappings, images will be copied unchanged");
    }

    Ok(AppConfig {
        input_dir,
        output_dir,
        color_map_name,
        color_map,
        threshold,
        quiet: matches.is_present("quiet"),
    })
}

pub fn init() -> Result<AppConfig, AppError> {
    let matches = build_cli().get_matches();
    config_from_matches(&matches, &default_config_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    use image::Rgb;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["recolor"];
        argv.extend_from_slice(args);
        build_cli()
            .try_get_matches_from(argv)
            .expect("arguments should parse")
    }

    #[test]
    fn test_defaults_use_builtin_railjet() {
        let dir = TempDir::new().unwrap();
        let config = config_from_matches(&matches(&["in", "out"]), dir.path()).unwrap();

        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.color_map_name, "railjet");
        assert_eq!(config.threshold, 65.0);
        assert!(!config.quiet);
        assert_eq!(
            config.color_map,
            ColorMap::new(vec![
                ColorMapping::new([164, 0, 0], [255, 255, 255]),
                ColorMapping::new([227, 30, 29], [0, 87, 174]),
            ])
        );
    }

    #[test]
    fn test_cli_overrides_threshold() {
        let dir = TempDir::new().unwrap();
        let config =
            config_from_matches(&matches(&["-t", "12.5", "-q", "in", "out"]), dir.path()).unwrap();
        assert_eq!(config.threshold, 12.5);
        assert!(config.quiet);
    }

    #[test]
    fn test_config_file_in_config_dir_is_layered() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "threshold = \"30\"\n").unwrap();

        let config = config_from_matches(&matches(&["in", "out"]), dir.path()).unwrap();
        assert_eq!(config.threshold, 30.0);
        assert_eq!(config.color_map_name, "railjet");

        let config =
            config_from_matches(&matches(&["--threshold", "5", "in", "out"]), dir.path()).unwrap();
        assert_eq!(config.threshold, 5.0);
    }

    #[test]
    fn test_explicit_config_file_overrides_config_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "threshold = \"30\"\n").unwrap();
        let custom = dir.path().join("custom.toml");
        fs::write(&custom, "threshold = \"40\"\n").unwrap();

        let custom = custom.to_str().unwrap();
        let config =
            config_from_matches(&matches(&["-c", custom, "in", "out"]), dir.path()).unwrap();
        assert_eq!(config.threshold, 40.0);
    }

    #[test]
    fn test_missing_explicit_config_file_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let result = config_from_matches(
            &matches(&["-c", missing.to_str().unwrap(), "in", "out"]),
            dir.path(),
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let dir = TempDir::new().unwrap();
        let result = config_from_matches(&matches(&["--threshold=-3", "in", "out"]), dir.path());
        assert!(matches!(result, Err(AppError::InvalidThreshold(_))));
    }

    #[test]
    fn test_color_map_file_takes_precedence_over_builtin() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("railjet.toml"),
            "[[mappings]]\nsrc = \"#000000\"\ndst = \"#ffffff\"\n",
        )
        .unwrap();

        let map = load_color_map("railjet", dir.path()).unwrap();
        assert_eq!(map.len(), 1);
        let mapping = map.iter().next().unwrap();
        assert_eq!(mapping.src, Rgb([0, 0, 0]));
        assert_eq!(mapping.dst, Rgb([255, 255, 255]));
    }

    #[test]
    fn test_color_map_file_keeps_order() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("swap.toml"),
            "[[mappings]]\nsrc = \"#ff0000\"\ndst = \"#0000ff\"\n\n[[mappings]]\nsrc = \"0000ff\"\ndst = \"ff0000\"\n",
        )
        .unwrap();

        let config =
            config_from_matches(&matches(&["-m", "swap", "in", "out"]), dir.path()).unwrap();
        let srcs: Vec<Rgb<u8>> = config.color_map.iter().map(|m| m.src).collect();
        assert_eq!(srcs, vec![Rgb([255, 0, 0]), Rgb([0, 0, 255])]);
    }

    #[test]
    fn test_empty_color_map_file_is_allowed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("none.toml"), "").unwrap();
        assert!(load_color_map("none", dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_color_map_fails() {
        let dir = TempDir::new().unwrap();
        let result = load_color_map("sunset", dir.path());
        assert!(matches!(result, Err(AppError::UnknownColorMap(name)) if name == "sunset"));
    }

    #[test]
    fn test_malformed_color_map_file_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.toml"), "[[mappings]]\nsrc = 12\n").unwrap();
        assert!(matches!(
            load_color_map("bad", dir.path()),
            Err(AppError::ColorMapFile { .. })
        ));

        fs::write(
            dir.path().join("badhex.toml"),
            "[[mappings]]\nsrc = \"#xyz123\"\ndst = \"#000000\"\n",
        )
        .unwrap();
        assert!(matches!(
            load_color_map("badhex", dir.path()),
            Err(AppError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_missing_positionals_are_rejected() {
        assert!(build_cli().try_get_matches_from(["recolor", "in"]).is_err());
    }
}

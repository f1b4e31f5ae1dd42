use crate::colorize::replace_colors_fuzzy;
use crate::error::AppError;
use crate::types::AppConfig;

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tracing::{debug, info};

/// Case-insensitive `.png` suffix check on a bare file name.
pub fn is_png_file_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".png")
}

/// Entries of `input_dir` with a `.png` name, sorted by file name. Entries are
/// not filtered by type, so a directory or dangling link fails when opened.
pub fn list_png_files(input_dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let read_err = |source| AppError::Read {
        path: input_dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(input_dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if is_png_file_name(&entry.file_name().to_string_lossy()) {
            files.push(entry.path());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Recolors every PNG of `config.input_dir` into `config.output_dir` under the
/// same file name. Stops at the first failing file.
pub fn recolor_directory(config: &AppConfig, pb: &ProgressBar) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(&config.output_dir).map_err(|source| AppError::CreateDir {
        path: config.output_dir.clone(),
        source,
    })?;

    let inputs = list_png_files(&config.input_dir)?;
    pb.set_length(inputs.len() as u64);

    let mut written = Vec::with_capacity(inputs.len());
    for input_path in &inputs {
        let Some(file_name) = input_path.file_name() else {
            continue;
        };
        let output_path = config.output_dir.join(file_name);

        pb.set_message(format!("Processing: {}", input_path.display()));
        replace_colors_fuzzy(input_path, &output_path, &config.color_map, config.threshold)?;
        debug!(input = %input_path.display(), output = %output_path.display(), "recolored");

        pb.inc(1);
        written.push(output_path);
    }

    info!(
        files = written.len(),
        color_map = %config.color_map_name,
        mappings = config.color_map.len(),
        threshold = config.threshold,
        "batch complete"
    );

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_filter_is_case_insensitive() {
        assert!(is_png_file_name("coach.png"));
        assert!(is_png_file_name("Ampz-2-rjng.PNG"));
        assert!(is_png_file_name("mixed.PnG"));
        assert!(is_png_file_name(".png"));
    }

    #[test]
    fn test_png_filter_rejects_other_names() {
        assert!(!is_png_file_name("coach.jpg"));
        assert!(!is_png_file_name("coach.png.bak"));
        assert!(!is_png_file_name("png"));
        assert!(!is_png_file_name("notes.txt"));
    }
}

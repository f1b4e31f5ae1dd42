use recolor::batch::recolor_directory;
use recolor::config::init;
use recolor::error::AppError;

use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recolor=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let config = init()?;

    let pb = progress_bar(config.quiet)?;
    let written = recolor_directory(&config, &pb)?;
    pb.finish_with_message(format!("Saved to: {}", config.output_dir.display()));

    println!("Recoloring finished successfully! ({} images)", written.len());
    Ok(())
}

fn progress_bar(quiet: bool) -> Result<ProgressBar, AppError> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

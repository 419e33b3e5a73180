//! CLI command for exporting an image file's records as PNGs

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{LOOKING_GLASS, PICTURE, print_done, print_step, simple_spinner};
use crate::export::export_image_set;
use crate::formats::idx::{IMAGE_MAGIC, read_images};

/// Decode an image file and export every record.
///
/// # Errors
/// Returns an error if decoding fails or any record cannot be written.
#[allow(clippy::too_many_arguments)]
pub fn execute(
    source: &Path,
    destination: &Path,
    stem: &str,
    magic: Option<i32>,
    count: usize,
    rows: usize,
    cols: usize,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();

    if !quiet {
        print_step(1, 2, LOOKING_GLASS, "Decoding images...");
    }
    let images = read_images(source, magic.unwrap_or(IMAGE_MAGIC), count, rows, cols)?;

    if !quiet {
        print_step(2, 2, PICTURE, "Exporting records...");
    }
    let spinner = (!quiet).then(|| simple_spinner(&format!("{} records", images.len())));
    let summary = export_image_set(&images, destination, stem)?;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if !quiet {
        print_done(started.elapsed());
        println!(
            "  {} written, {} already present, in {}",
            summary.written,
            summary.skipped,
            destination.display()
        );
    }

    Ok(())
}

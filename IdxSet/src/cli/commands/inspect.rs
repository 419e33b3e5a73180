//! CLI command for decoding and summarizing a single IDX file

use std::path::Path;

use super::FileKind;
use crate::formats::idx::{IMAGE_MAGIC, LABEL_MAGIC, read_images, read_labels};

/// Decode one file and print a summary.
///
/// # Errors
/// Returns an error if the file cannot be decoded or fails validation.
pub fn execute(
    source: &Path,
    kind: FileKind,
    magic: Option<i32>,
    count: usize,
    rows: usize,
    cols: usize,
) -> anyhow::Result<()> {
    match kind {
        FileKind::Labels => {
            let labels = read_labels(source, magic.unwrap_or(LABEL_MAGIC), count)?;

            println!("{}: label file", source.display());
            println!("  records: {}", labels.len());

            // Distribution of label values
            let mut histogram = [0usize; 256];
            for &label in &labels {
                histogram[label as usize] += 1;
            }
            let distinct = histogram.iter().filter(|&&n| n > 0).count();
            println!("  distinct values: {distinct}");
            for (value, &n) in histogram.iter().enumerate() {
                if n > 0 {
                    println!("    {value}: {n}");
                }
            }
        }
        FileKind::Images => {
            let images = read_images(source, magic.unwrap_or(IMAGE_MAGIC), count, rows, cols)?;
            let (n, r, c) = images.shape();

            println!("{}: image file", source.display());
            println!("  records: {n}");
            println!("  raster:  {r}x{c}");

            let bytes = images.as_bytes();
            let min = bytes.iter().copied().min().unwrap_or(0);
            let max = bytes.iter().copied().max().unwrap_or(0);
            let nonzero = bytes.iter().filter(|&&b| b != 0).count();
            println!("  pixel range: {min}..={max}");
            if !bytes.is_empty() {
                println!(
                    "  nonzero pixels: {nonzero}/{} ({:.1}%)",
                    bytes.len(),
                    100.0 * nonzero as f64 / bytes.len() as f64
                );
            }
        }
    }

    Ok(())
}

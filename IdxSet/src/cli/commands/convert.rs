//! CLI command for full dataset conversion

use std::cell::Cell;
use std::path::PathBuf;
use std::time::Instant;

use console::Emoji;

use crate::cli::progress::{LOOKING_GLASS, PACKAGE, PICTURE, print_done, print_step};
use crate::convert::{ConvertOptions, ConvertPhase, convert_dataset_with_progress};

/// Resolved arguments of the `convert` command
pub struct ConvertArgs {
    pub data_dir: PathBuf,
    pub destination: PathBuf,
    pub images: Option<PathBuf>,
    pub train_labels: Option<PathBuf>,
    pub train_images: Option<PathBuf>,
    pub test_labels: Option<PathBuf>,
    pub test_images: Option<PathBuf>,
    pub train_count: usize,
    pub test_count: usize,
    pub rows: usize,
    pub cols: usize,
    pub quiet: bool,
}

fn phase_emoji(phase: ConvertPhase) -> Emoji<'static, 'static> {
    match phase {
        ConvertPhase::DecodeLabels | ConvertPhase::DecodeImages | ConvertPhase::Done => {
            LOOKING_GLASS
        }
        ConvertPhase::ExportImages => PICTURE,
        ConvertPhase::WriteArchive => PACKAGE,
    }
}

fn phase_verb(phase: ConvertPhase) -> &'static str {
    match phase {
        ConvertPhase::DecodeLabels | ConvertPhase::DecodeImages => "Decoding",
        ConvertPhase::ExportImages => "Exporting",
        ConvertPhase::WriteArchive => "Writing",
        ConvertPhase::Done => "",
    }
}

/// Run the full four-file conversion.
///
/// # Errors
/// Returns an error if any decode, export, or archive step fails.
pub fn execute(args: &ConvertArgs) -> anyhow::Result<()> {
    let mut options = ConvertOptions::standard(&args.data_dir, &args.destination);
    options.train_count = args.train_count;
    options.test_count = args.test_count;
    options.rows = args.rows;
    options.cols = args.cols;
    options.image_dir = args.images.clone();

    if let Some(path) = &args.train_labels {
        options.train_labels = path.clone();
    }
    if let Some(path) = &args.train_images {
        options.train_images = path.clone();
    }
    if let Some(path) = &args.test_labels {
        options.test_labels = path.clone();
    }
    if let Some(path) = &args.test_images {
        options.test_images = path.clone();
    }

    // 4 decode steps + 2 export steps (when enabled) + 1 archive step
    let total_steps = if options.image_dir.is_some() { 7 } else { 5 };
    let step = Cell::new(0usize);
    let started = Instant::now();

    let quiet = args.quiet;
    let summary = convert_dataset_with_progress(&options, &|phase, detail| {
        if quiet || phase == ConvertPhase::Done {
            return;
        }
        step.set(step.get() + 1);
        print_step(
            step.get(),
            total_steps,
            phase_emoji(phase),
            &format!("{} {detail}...", phase_verb(phase)),
        );
    })?;

    if !quiet {
        print_done(started.elapsed());
        println!();
        println!(
            "  training: {} labels, {:?} images",
            summary.train_label_count, summary.train_image_shape
        );
        println!(
            "  test:     {} labels, {:?} images",
            summary.test_label_count, summary.test_image_shape
        );
        if let Some(export) = summary.export {
            println!(
                "  exported: {} PNGs ({} already present)",
                export.written, export.skipped
            );
        }
        println!("  archive:  {}", options.archive_path.display());
    }

    Ok(())
}

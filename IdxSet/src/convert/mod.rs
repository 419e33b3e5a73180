//! Four-file dataset conversion
//!
//! The standard pipeline: decode the training and test label/image files
//! against expected parameters, optionally export every image record as a
//! grayscale PNG, and pack all four arrays into a single dataset archive.
//! Each input file owns its own byte source, so the four decodes are
//! independent of one another.

use std::path::{Path, PathBuf};

use crate::archive::ArchiveWriter;
use crate::error::Result;
use crate::export::{ExportSummary, export_image_set};
use crate::formats::idx::{IMAGE_MAGIC, LABEL_MAGIC, read_images, read_labels};

/// Dataset names used inside the archive, in write order.
pub const DATASET_NAMES: [&str; 4] = [
    "training_labels",
    "training_images",
    "test_labels",
    "test_images",
];

/// Phase of a dataset conversion, reported through the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertPhase {
    /// Decoding a label file.
    DecodeLabels,
    /// Decoding an image file.
    DecodeImages,
    /// Exporting image records as PNGs.
    ExportImages,
    /// Writing the dataset archive.
    WriteArchive,
    /// Conversion finished.
    Done,
}

/// Progress callback type for conversion runs.
///
/// Receives the current phase and a short human-readable detail string.
pub type ConvertProgressCallback<'a> = &'a dyn Fn(ConvertPhase, &str);

/// Inputs and expectations for a conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Training label file.
    pub train_labels: PathBuf,
    /// Training image file.
    pub train_images: PathBuf,
    /// Test label file.
    pub test_labels: PathBuf,
    /// Test image file.
    pub test_images: PathBuf,
    /// Expected magic number of the label files.
    pub label_magic: i32,
    /// Expected magic number of the image files.
    pub image_magic: i32,
    /// Expected training record count.
    pub train_count: usize,
    /// Expected test record count.
    pub test_count: usize,
    /// Expected raster height.
    pub rows: usize,
    /// Expected raster width.
    pub cols: usize,
    /// Target path of the dataset archive.
    pub archive_path: PathBuf,
    /// Directory for per-record PNG export; `None` skips the export.
    pub image_dir: Option<PathBuf>,
}

impl ConvertOptions {
    /// Options for the standard MNIST file layout under `data_dir`:
    /// conventional magics, 60000/10000 records, 28x28 rasters.
    pub fn standard<P: AsRef<Path>, Q: AsRef<Path>>(data_dir: P, archive_path: Q) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            train_labels: data_dir.join("train-labels.idx1-ubyte"),
            train_images: data_dir.join("train-images.idx3-ubyte"),
            test_labels: data_dir.join("t10k-labels.idx1-ubyte"),
            test_images: data_dir.join("t10k-images.idx3-ubyte"),
            label_magic: LABEL_MAGIC,
            image_magic: IMAGE_MAGIC,
            train_count: 60000,
            test_count: 10000,
            rows: 28,
            cols: 28,
            archive_path: archive_path.as_ref().to_path_buf(),
            image_dir: None,
        }
    }

    /// Enable per-record PNG export under `dir`.
    pub fn with_image_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.image_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}

/// Outcome of a conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConvertSummary {
    /// Training labels decoded.
    pub train_label_count: usize,
    /// Test labels decoded.
    pub test_label_count: usize,
    /// Training image tensor shape.
    pub train_image_shape: (usize, usize, usize),
    /// Test image tensor shape.
    pub test_image_shape: (usize, usize, usize),
    /// Combined PNG export outcome, if export ran.
    pub export: Option<ExportSummary>,
}

/// Run a conversion with no progress reporting.
///
/// # Errors
///
/// Returns the first decode, export, or archive error encountered; a
/// failed decode aborts the run before the archive is written.
pub fn convert_dataset(options: &ConvertOptions) -> Result<ConvertSummary> {
    convert_dataset_with_progress(options, &|_, _| {})
}

/// Run a conversion, reporting phases through `progress`.
///
/// # Errors
///
/// See [`convert_dataset`].
pub fn convert_dataset_with_progress(
    options: &ConvertOptions,
    progress: ConvertProgressCallback,
) -> Result<ConvertSummary> {
    progress(ConvertPhase::DecodeLabels, "training labels");
    let train_labels = read_labels(
        &options.train_labels,
        options.label_magic,
        options.train_count,
    )?;

    progress(ConvertPhase::DecodeLabels, "test labels");
    let test_labels = read_labels(
        &options.test_labels,
        options.label_magic,
        options.test_count,
    )?;

    progress(ConvertPhase::DecodeImages, "training images");
    let train_images = read_images(
        &options.train_images,
        options.image_magic,
        options.train_count,
        options.rows,
        options.cols,
    )?;

    progress(ConvertPhase::DecodeImages, "test images");
    let test_images = read_images(
        &options.test_images,
        options.image_magic,
        options.test_count,
        options.rows,
        options.cols,
    )?;

    let export = match &options.image_dir {
        Some(dir) => {
            progress(ConvertPhase::ExportImages, "training images");
            let training = export_image_set(&train_images, &dir.join("training"), "im")?;

            progress(ConvertPhase::ExportImages, "test images");
            let test = export_image_set(&test_images, &dir.join("test"), "im")?;

            Some(ExportSummary {
                written: training.written + test.written,
                skipped: training.skipped + test.skipped,
            })
        }
        None => None,
    };

    progress(ConvertPhase::WriteArchive, "dataset archive");
    let mut writer = ArchiveWriter::create(&options.archive_path)?;
    writer.add_labels(DATASET_NAMES[0], &train_labels)?;
    writer.add_images(DATASET_NAMES[1], &train_images)?;
    writer.add_labels(DATASET_NAMES[2], &test_labels)?;
    writer.add_images(DATASET_NAMES[3], &test_images)?;
    writer.finish()?;

    progress(ConvertPhase::Done, "");
    Ok(ConvertSummary {
        train_label_count: train_labels.len(),
        test_label_count: test_labels.len(),
        train_image_shape: train_images.shape(),
        test_image_shape: test_images.shape(),
        export,
    })
}

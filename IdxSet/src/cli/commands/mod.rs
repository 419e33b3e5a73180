use std::path::PathBuf;
use std::str::FromStr;

use clap::Subcommand;

pub mod convert;
pub mod export;
pub mod inspect;

/// Dataset file kind for single-file commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A label file (two-field header, one byte per record)
    Labels,
    /// An image file (four-field header, rows*cols bytes per record)
    Images,
}

impl FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "label" | "labels" | "l" => Ok(FileKind::Labels),
            "image" | "images" | "i" => Ok(FileKind::Images),
            _ => Err(format!(
                "Invalid kind '{s}'. Valid values: label/labels/l, image/images/i"
            )),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a four-file dataset into an archive, optionally exporting PNGs
    Convert {
        /// Directory holding the standard dataset file layout
        #[arg(short = 'D', long, default_value = "data")]
        data_dir: PathBuf,

        /// Output archive path
        #[arg(short, long, default_value = "dataset.idxpack")]
        destination: PathBuf,

        /// Export every image record as PNG under this directory
        #[arg(long)]
        images: Option<PathBuf>,

        /// Training label file (overrides the data-dir layout)
        #[arg(long)]
        train_labels: Option<PathBuf>,

        /// Training image file (overrides the data-dir layout)
        #[arg(long)]
        train_images: Option<PathBuf>,

        /// Test label file (overrides the data-dir layout)
        #[arg(long)]
        test_labels: Option<PathBuf>,

        /// Test image file (overrides the data-dir layout)
        #[arg(long)]
        test_images: Option<PathBuf>,

        /// Expected training record count
        #[arg(long, default_value_t = 60000)]
        train_count: usize,

        /// Expected test record count
        #[arg(long, default_value_t = 10000)]
        test_count: usize,

        /// Expected raster height
        #[arg(long, default_value_t = 28)]
        rows: usize,

        /// Expected raster width
        #[arg(long, default_value_t = 28)]
        cols: usize,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Decode a single IDX file and print a summary
    Inspect {
        /// Source IDX file
        source: PathBuf,

        /// File kind: labels or images
        #[arg(short, long)]
        kind: FileKind,

        /// Expected magic number (defaults to the conventional value for the kind)
        #[arg(short, long)]
        magic: Option<i32>,

        /// Expected record count
        #[arg(short, long)]
        count: usize,

        /// Expected raster height (images only)
        #[arg(long, default_value_t = 28)]
        rows: usize,

        /// Expected raster width (images only)
        #[arg(long, default_value_t = 28)]
        cols: usize,
    },

    /// Decode an image file and export its records as PNGs
    Export {
        /// Source IDX image file
        source: PathBuf,

        /// Output directory
        #[arg(short, long)]
        destination: PathBuf,

        /// Filename stem for exported records
        #[arg(long, default_value = "im")]
        stem: String,

        /// Expected magic number
        #[arg(short, long)]
        magic: Option<i32>,

        /// Expected record count
        #[arg(short, long)]
        count: usize,

        /// Expected raster height
        #[arg(long, default_value_t = 28)]
        rows: usize,

        /// Expected raster width
        #[arg(long, default_value_t = 28)]
        cols: usize,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Convert {
                data_dir,
                destination,
                images,
                train_labels,
                train_images,
                test_labels,
                test_images,
                train_count,
                test_count,
                rows,
                cols,
                quiet,
            } => convert::execute(&convert::ConvertArgs {
                data_dir: data_dir.clone(),
                destination: destination.clone(),
                images: images.clone(),
                train_labels: train_labels.clone(),
                train_images: train_images.clone(),
                test_labels: test_labels.clone(),
                test_images: test_images.clone(),
                train_count: *train_count,
                test_count: *test_count,
                rows: *rows,
                cols: *cols,
                quiet: *quiet,
            }),
            Commands::Inspect {
                source,
                kind,
                magic,
                count,
                rows,
                cols,
            } => inspect::execute(source, *kind, *magic, *count, *rows, *cols),
            Commands::Export {
                source,
                destination,
                stem,
                magic,
                count,
                rows,
                cols,
                quiet,
            } => export::execute(
                source,
                destination,
                stem,
                *magic,
                *count,
                *rows,
                *cols,
                *quiet,
            ),
        }
    }
}

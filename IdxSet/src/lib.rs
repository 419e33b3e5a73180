//! # IdxSet
//!
//! A pure-Rust library for decoding, validating, and repacking IDX-style
//! binary datasets (the layout used by the MNIST archives).
//!
//! ## Supported Operations
//!
//! - **Decode** - Label and image files with fail-fast validation against
//!   caller-supplied expectations (magic number, count, raster extents)
//! - **Export** - Each image record as an 8-bit grayscale PNG, idempotent
//!   across re-runs
//! - **Pack** - All four decoded arrays into a single dataset archive with
//!   a checksummed manifest
//!
//! ## Quick Start
//!
//! ### Decoding IDX files
//!
//! ```no_run
//! use idxset::formats::idx::{self, IMAGE_MAGIC, LABEL_MAGIC};
//!
//! // Decode a label file, validating magic and record count
//! let labels = idx::read_labels("data/train-labels.idx1-ubyte", LABEL_MAGIC, 60000)?;
//!
//! // Decode an image file, additionally validating the raster extents
//! let images = idx::read_images("data/train-images.idx3-ubyte", IMAGE_MAGIC, 60000, 28, 28)?;
//! println!("decoded {:?}", images.shape());
//! # Ok::<(), idxset::Error>(())
//! ```
//!
//! ### Converting a full dataset
//!
//! ```no_run
//! use idxset::convert::{ConvertOptions, convert_dataset};
//!
//! let options = ConvertOptions::standard("data/", "dataset.idxpack")
//!     .with_image_dir("img/");
//! let summary = convert_dataset(&options)?;
//! println!("{} training labels", summary.train_label_count);
//! # Ok::<(), idxset::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use idxset::prelude::*;
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `idxset` command-line binary

pub mod archive;
pub mod convert;
pub mod error;
pub mod export;
pub mod formats;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::archive::{ArchiveWriter, DatasetArchive, Manifest};
    pub use crate::convert::{ConvertOptions, ConvertSummary, convert_dataset};
    pub use crate::error::{Error, Result};
    pub use crate::export::{ExportSummary, export_image_set, export_record};
    pub use crate::formats::idx::{
        IMAGE_MAGIC, ImageSet, LABEL_MAGIC, decode_images, decode_labels, read_images,
        read_labels,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

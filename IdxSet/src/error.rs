//! Error types for `IdxSet`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `IdxSet` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== IDX Header Errors ====================
    /// The stream ended before the full header could be read.
    #[error("truncated header: expected {expected} bytes, only {actual} available")]
    TruncatedHeader {
        /// Bytes required to hold the header fields.
        expected: usize,
        /// Bytes actually available before end of stream.
        actual: usize,
    },

    /// The magic number does not match the caller's expectation.
    #[error("magic number mismatch: expected {expected}, found {found}")]
    MagicMismatch {
        /// The caller-supplied magic number.
        expected: i32,
        /// The magic number read from the header.
        found: i32,
    },

    /// The record count does not match the caller's expectation.
    #[error("record count mismatch: expected {expected}, found {found}")]
    CountMismatch {
        /// The caller-supplied record count.
        expected: i32,
        /// The record count read from the header.
        found: i32,
    },

    /// The row extent does not match the caller's expectation.
    #[error("row extent mismatch: expected {expected}, found {found}")]
    RowMismatch {
        /// The caller-supplied row extent.
        expected: i32,
        /// The row extent read from the header.
        found: i32,
    },

    /// The column extent does not match the caller's expectation.
    #[error("column extent mismatch: expected {expected}, found {found}")]
    ColMismatch {
        /// The caller-supplied column extent.
        expected: i32,
        /// The column extent read from the header.
        found: i32,
    },

    /// The payload does not divide evenly into the expected record shape.
    #[error("payload size mismatch: expected {expected} bytes, found {actual}")]
    PayloadSizeMismatch {
        /// Byte count the expected record shape requires.
        expected: usize,
        /// Byte count actually present after the header.
        actual: usize,
    },

    // ==================== Export Errors ====================
    /// The raster byte length does not match its stated dimensions.
    #[error("raster length does not match {rows}x{cols}")]
    RasterShapeInvalid {
        /// Raster height in pixels.
        rows: usize,
        /// Raster width in pixels.
        cols: usize,
    },

    /// Failed to encode a raster as PNG.
    #[error("failed to encode PNG: {message}")]
    PngEncodeFailed {
        /// The encoding error message.
        message: String,
    },

    // ==================== Container Errors ====================
    /// Zip-level error while reading or writing the dataset archive.
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The archive has no manifest entry.
    #[error("archive manifest missing: {path}")]
    ManifestMissing {
        /// Path of the archive that was opened.
        path: PathBuf,
    },

    /// The requested dataset is not present in the archive.
    #[error("dataset '{name}' not found in archive")]
    DatasetNotFound {
        /// The dataset name that was requested.
        name: String,
    },

    /// Stored dataset bytes do not match the manifest checksum or length.
    #[error("checksum mismatch for dataset '{name}'")]
    ChecksumMismatch {
        /// The dataset whose bytes failed verification.
        name: String,
    },
}

/// A specialized Result type for `IdxSet` operations.
pub type Result<T> = std::result::Result<T, Error>;

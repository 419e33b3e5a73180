//! IDX file decoding with caller-supplied validation
//!
//! Both decode paths are linear: read the header once, validate each field
//! in order against the caller's expectations, then consume the rest of the
//! source as the payload. The first failing field aborts the decode; no
//! payload byte is read after a header mismatch.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{IMAGE_HEADER_FIELDS, ImageSet, LABEL_HEADER_FIELDS, header::read_header};
use crate::error::{Error, Result};

/// Decode a label stream: two-field header, then one byte per record.
///
/// Validates the magic number and record count against the caller's
/// expectations, then reads the remaining bytes as the label payload,
/// which must hold exactly `expected_count` bytes.
///
/// # Errors
///
/// Returns [`Error::TruncatedHeader`], [`Error::MagicMismatch`],
/// [`Error::CountMismatch`], or [`Error::PayloadSizeMismatch`]; each
/// mismatch aborts the decode at the first failing field.
///
/// [`Error::TruncatedHeader`]: crate::Error::TruncatedHeader
/// [`Error::MagicMismatch`]: crate::Error::MagicMismatch
/// [`Error::CountMismatch`]: crate::Error::CountMismatch
/// [`Error::PayloadSizeMismatch`]: crate::Error::PayloadSizeMismatch
pub fn decode_labels<R: Read>(
    source: &mut R,
    expected_magic: i32,
    expected_count: usize,
) -> Result<Vec<u8>> {
    let header = read_header(source, LABEL_HEADER_FIELDS)?;

    if header[0] != expected_magic {
        return Err(Error::MagicMismatch {
            expected: expected_magic,
            found: header[0],
        });
    }
    if header[1] != expected_count as i32 {
        return Err(Error::CountMismatch {
            expected: expected_count as i32,
            found: header[1],
        });
    }

    let mut labels = Vec::with_capacity(expected_count);
    source.read_to_end(&mut labels)?;
    if labels.len() != expected_count {
        return Err(Error::PayloadSizeMismatch {
            expected: expected_count,
            actual: labels.len(),
        });
    }

    tracing::debug!("decoded {} label records", labels.len());
    Ok(labels)
}

/// Decode an image stream: four-field header, then `rows * cols` bytes per
/// record.
///
/// Validates magic, count, rows, and cols in that order, then reads the
/// remaining bytes as the raster payload, which must hold exactly
/// `expected_count * expected_rows * expected_cols` bytes. The result is
/// record-major and row-major; see [`ImageSet`].
///
/// # Errors
///
/// Returns [`Error::TruncatedHeader`], [`Error::MagicMismatch`],
/// [`Error::CountMismatch`], [`Error::RowMismatch`],
/// [`Error::ColMismatch`], or [`Error::PayloadSizeMismatch`]; each
/// mismatch aborts the decode at the first failing field.
///
/// [`Error::TruncatedHeader`]: crate::Error::TruncatedHeader
/// [`Error::MagicMismatch`]: crate::Error::MagicMismatch
/// [`Error::CountMismatch`]: crate::Error::CountMismatch
/// [`Error::RowMismatch`]: crate::Error::RowMismatch
/// [`Error::ColMismatch`]: crate::Error::ColMismatch
/// [`Error::PayloadSizeMismatch`]: crate::Error::PayloadSizeMismatch
pub fn decode_images<R: Read>(
    source: &mut R,
    expected_magic: i32,
    expected_count: usize,
    expected_rows: usize,
    expected_cols: usize,
) -> Result<ImageSet> {
    let header = read_header(source, IMAGE_HEADER_FIELDS)?;

    if header[0] != expected_magic {
        return Err(Error::MagicMismatch {
            expected: expected_magic,
            found: header[0],
        });
    }
    if header[1] != expected_count as i32 {
        return Err(Error::CountMismatch {
            expected: expected_count as i32,
            found: header[1],
        });
    }
    if header[2] != expected_rows as i32 {
        return Err(Error::RowMismatch {
            expected: expected_rows as i32,
            found: header[2],
        });
    }
    if header[3] != expected_cols as i32 {
        return Err(Error::ColMismatch {
            expected: expected_cols as i32,
            found: header[3],
        });
    }

    let expected_bytes = expected_count * expected_rows * expected_cols;
    let mut payload = Vec::with_capacity(expected_bytes);
    source.read_to_end(&mut payload)?;
    if payload.len() != expected_bytes {
        return Err(Error::PayloadSizeMismatch {
            expected: expected_bytes,
            actual: payload.len(),
        });
    }

    tracing::debug!(
        "decoded {} image records ({expected_rows}x{expected_cols})",
        expected_count
    );
    Ok(ImageSet::new(
        expected_count,
        expected_rows,
        expected_cols,
        payload,
    ))
}

/// Read and decode an IDX label file from disk.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened, or any of the
/// [`decode_labels`] validation errors.
///
/// [`Error::Io`]: crate::Error::Io
pub fn read_labels<P: AsRef<Path>>(
    path: P,
    expected_magic: i32,
    expected_count: usize,
) -> Result<Vec<u8>> {
    let path = path.as_ref();
    tracing::info!("decoding labels from {}", path.display());

    let mut reader = BufReader::new(File::open(path)?);
    decode_labels(&mut reader, expected_magic, expected_count)
}

/// Read and decode an IDX image file from disk.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened, or any of the
/// [`decode_images`] validation errors.
///
/// [`Error::Io`]: crate::Error::Io
pub fn read_images<P: AsRef<Path>>(
    path: P,
    expected_magic: i32,
    expected_count: usize,
    expected_rows: usize,
    expected_cols: usize,
) -> Result<ImageSet> {
    let path = path.as_ref();
    tracing::info!("decoding images from {}", path.display());

    let mut reader = BufReader::new(File::open(path)?);
    decode_images(
        &mut reader,
        expected_magic,
        expected_count,
        expected_rows,
        expected_cols,
    )
}

//! Per-record grayscale PNG export
//!
//! Writes each decoded image record as an 8-bit grayscale PNG. A
//! destination that already exists is skipped, so re-running an export is
//! idempotent. Writes go through a temp file in the destination directory
//! followed by a no-clobber rename, which keeps the output intact when two
//! workers race on the same path.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use rayon::prelude::*;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::formats::idx::ImageSet;

/// Outcome of an image-set export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Files written by this run.
    pub written: usize,
    /// Destinations skipped because a file already existed.
    pub skipped: usize,
}

impl ExportSummary {
    /// Total records visited.
    pub fn total(&self) -> usize {
        self.written + self.skipped
    }
}

/// Export a single `rows x cols` raster as an 8-bit grayscale PNG.
///
/// Returns `Ok(true)` if the file was written, `Ok(false)` if a file
/// already existed at `path` (the call is then a no-op).
///
/// # Errors
///
/// Returns [`Error::RasterShapeInvalid`] if the raster length is not
/// `rows * cols`, [`Error::PngEncodeFailed`] if encoding fails, or
/// [`Error::Io`] on filesystem errors.
///
/// [`Error::RasterShapeInvalid`]: crate::Error::RasterShapeInvalid
/// [`Error::PngEncodeFailed`]: crate::Error::PngEncodeFailed
/// [`Error::Io`]: crate::Error::Io
pub fn export_record(raster: &[u8], rows: usize, cols: usize, path: &Path) -> Result<bool> {
    if raster.len() != rows * cols {
        return Err(Error::RasterShapeInvalid { rows, cols });
    }
    if path.exists() {
        return Ok(false);
    }

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new_in(".")?,
    };

    let encoder = PngEncoder::new(&mut tmp);
    encoder
        .write_image(raster, cols as u32, rows as u32, ExtendedColorType::L8)
        .map_err(|e| Error::PngEncodeFailed {
            message: e.to_string(),
        })?;

    // A second worker may have created the destination since the exists
    // check; losing the rename race counts as "already present"
    match tmp.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(Error::Io(e.error)),
    }
}

/// Export every record of `images` as `<stem>_<i>.png` under `dir`.
///
/// The directory is created if missing. Records are independent, so the
/// per-record loop runs in parallel.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory cannot be created, or any
/// [`export_record`] error for an individual record.
///
/// [`Error::Io`]: crate::Error::Io
pub fn export_image_set(images: &ImageSet, dir: &Path, stem: &str) -> Result<ExportSummary> {
    fs::create_dir_all(dir)?;

    let span = images.rows() * images.cols();
    if images.is_empty() || span == 0 {
        return Ok(ExportSummary::default());
    }

    let outcomes: Vec<bool> = images
        .as_bytes()
        .par_chunks_exact(span)
        .enumerate()
        .map(|(i, raster)| {
            let dest = dir.join(format!("{stem}_{i}.png"));
            export_record(raster, images.rows(), images.cols(), &dest)
        })
        .collect::<Result<_>>()?;

    let written = outcomes.iter().filter(|wrote| **wrote).count();
    let summary = ExportSummary {
        written,
        skipped: outcomes.len() - written,
    };

    tracing::info!(
        "exported {} rasters to {} ({} already present)",
        summary.written,
        dir.display(),
        summary.skipped
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::formats::idx::ImageSet;

    fn sample_set() -> ImageSet {
        ImageSet::new(2, 2, 2, vec![10, 20, 30, 40, 50, 60, 70, 80])
    }

    #[test]
    fn exports_every_record_once() {
        let dir = tempdir().unwrap();
        let images = sample_set();

        let summary = export_image_set(&images, dir.path(), "im").unwrap();
        assert_eq!(summary, ExportSummary { written: 2, skipped: 0 });
        assert!(dir.path().join("im_0.png").exists());
        assert!(dir.path().join("im_1.png").exists());
    }

    #[test]
    fn second_export_is_a_no_op() {
        let dir = tempdir().unwrap();
        let images = sample_set();

        export_image_set(&images, dir.path(), "im").unwrap();
        let first = fs::read(dir.path().join("im_0.png")).unwrap();

        let summary = export_image_set(&images, dir.path(), "im").unwrap();
        assert_eq!(summary, ExportSummary { written: 0, skipped: 2 });

        let second = fs::read(dir.path().join("im_0.png")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn existing_destination_is_left_untouched() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("keep.png");
        fs::write(&dest, b"sentinel").unwrap();

        let wrote = export_record(&[1, 2, 3, 4], 2, 2, &dest).unwrap();
        assert!(!wrote);
        assert_eq!(fs::read(&dest).unwrap(), b"sentinel");
    }

    #[test]
    fn exported_png_decodes_back_to_the_raster() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("raster.png");

        export_record(&[0, 64, 128, 255], 2, 2, &dest).unwrap();

        let img = image::open(&dest).unwrap().into_luma8();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.into_raw(), vec![0, 64, 128, 255]);
    }

    #[test]
    fn wrong_raster_length_is_rejected() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("bad.png");

        let err = export_record(&[1, 2, 3], 2, 2, &dest).unwrap_err();
        assert!(matches!(
            err,
            Error::RasterShapeInvalid { rows: 2, cols: 2 }
        ));
        assert!(!dest.exists());
    }
}

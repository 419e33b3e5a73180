//! Dataset container archive
//!
//! Packs decoded arrays into a single zip container keyed by dataset name,
//! with a JSON manifest describing each entry (shape, dtype, byte length,
//! CRC32). Creating an archive replaces any existing file at the target
//! path wholesale. Reading back verifies stored bytes against the
//! manifest.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};
use crate::formats::idx::ImageSet;

/// Name of the manifest entry inside the archive.
pub const MANIFEST_NAME: &str = "manifest.json";

/// Current manifest layout version.
pub const MANIFEST_VERSION: u32 = 1;

/// Per-dataset manifest record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetEntry {
    /// Dataset name, also the zip entry name.
    pub name: String,
    /// Tensor shape; `[count]` for labels, `[count, rows, cols]` for images.
    pub shape: Vec<usize>,
    /// Element type; always `"u8"` for IDX payloads.
    pub dtype: String,
    /// Stored byte length.
    pub byte_len: usize,
    /// CRC32 of the stored bytes.
    pub crc32: u32,
}

/// Archive manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Manifest layout version.
    pub format_version: u32,
    /// Creation timestamp, RFC 3339.
    pub created: String,
    /// Datasets in write order.
    pub datasets: Vec<DatasetEntry>,
}

impl Manifest {
    /// Look up a dataset record by name.
    pub fn dataset(&self, name: &str) -> Option<&DatasetEntry> {
        self.datasets.iter().find(|d| d.name == name)
    }
}

/// Writer for a dataset archive.
///
/// Datasets are appended with [`add_labels`] / [`add_images`], then the
/// manifest is written by [`finish`]. Dropping the writer without calling
/// [`finish`] leaves an archive with no manifest, which [`DatasetArchive::open`]
/// rejects.
///
/// [`add_labels`]: ArchiveWriter::add_labels
/// [`add_images`]: ArchiveWriter::add_images
/// [`finish`]: ArchiveWriter::finish
pub struct ArchiveWriter {
    zip: ZipWriter<File>,
    manifest: Manifest,
}

impl ArchiveWriter {
    /// Create an archive at `path`, replacing any existing file wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be created.
    ///
    /// [`Error::Io`]: crate::Error::Io
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("creating dataset archive at {}", path.display());

        let file = File::create(path)?;
        Ok(Self {
            zip: ZipWriter::new(file),
            manifest: Manifest {
                format_version: MANIFEST_VERSION,
                created: Utc::now().to_rfc3339(),
                datasets: Vec::new(),
            },
        })
    }

    /// Add a label dataset under `name`.
    pub fn add_labels(&mut self, name: &str, labels: &[u8]) -> Result<()> {
        self.add_dataset(name, vec![labels.len()], labels)
    }

    /// Add an image dataset under `name`.
    pub fn add_images(&mut self, name: &str, images: &ImageSet) -> Result<()> {
        let (count, rows, cols) = images.shape();
        self.add_dataset(name, vec![count, rows, cols], images.as_bytes())
    }

    fn add_dataset(&mut self, name: &str, shape: Vec<usize>, bytes: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.zip.start_file(name, options)?;
        self.zip.write_all(bytes)?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(bytes);

        self.manifest.datasets.push(DatasetEntry {
            name: name.to_string(),
            shape,
            dtype: "u8".to_string(),
            byte_len: bytes.len(),
            crc32: hasher.finalize(),
        });

        tracing::debug!("added dataset '{name}' ({} bytes)", bytes.len());
        Ok(())
    }

    /// Write the manifest and finalize the archive.
    pub fn finish(mut self) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.zip.start_file(MANIFEST_NAME, options)?;
        let json = serde_json::to_vec_pretty(&self.manifest)?;
        self.zip.write_all(&json)?;
        self.zip.finish()?;

        tracing::info!(
            "archive finalized with {} datasets",
            self.manifest.datasets.len()
        );
        Ok(())
    }
}

/// Read side of a dataset archive.
#[derive(Debug)]
pub struct DatasetArchive {
    zip: ZipArchive<File>,
    manifest: Manifest,
    path: PathBuf,
}

impl DatasetArchive {
    /// Open an archive and parse its manifest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened,
    /// [`Error::ManifestMissing`] if there is no manifest entry, or
    /// [`Error::Json`] if the manifest cannot be parsed.
    ///
    /// [`Error::Io`]: crate::Error::Io
    /// [`Error::ManifestMissing`]: crate::Error::ManifestMissing
    /// [`Error::Json`]: crate::Error::Json
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut zip = ZipArchive::new(File::open(&path)?)?;

        let manifest = {
            let mut entry = match zip.by_name(MANIFEST_NAME) {
                Ok(entry) => entry,
                Err(ZipError::FileNotFound) => {
                    return Err(Error::ManifestMissing { path });
                }
                Err(e) => return Err(e.into()),
            };
            let mut json = Vec::new();
            entry.read_to_end(&mut json)?;
            serde_json::from_slice::<Manifest>(&json)?
        };

        Ok(Self {
            zip,
            manifest,
            path,
        })
    }

    /// The archive manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Path this archive was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a dataset's bytes by name, verifying length and CRC against
    /// the manifest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatasetNotFound`] if the name is absent from the
    /// manifest or the archive, or [`Error::ChecksumMismatch`] if the
    /// stored bytes fail verification.
    ///
    /// [`Error::DatasetNotFound`]: crate::Error::DatasetNotFound
    /// [`Error::ChecksumMismatch`]: crate::Error::ChecksumMismatch
    pub fn dataset(&mut self, name: &str) -> Result<Vec<u8>> {
        let entry = self
            .manifest
            .dataset(name)
            .ok_or_else(|| Error::DatasetNotFound {
                name: name.to_string(),
            })?
            .clone();

        let mut stored = match self.zip.by_name(name) {
            Ok(stored) => stored,
            Err(ZipError::FileNotFound) => {
                return Err(Error::DatasetNotFound {
                    name: name.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::with_capacity(entry.byte_len);
        stored.read_to_end(&mut bytes)?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&bytes);
        if bytes.len() != entry.byte_len || hasher.finalize() != entry.crc32 {
            return Err(Error::ChecksumMismatch {
                name: name.to_string(),
            });
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::formats::idx::ImageSet;

    #[test]
    fn round_trips_datasets_by_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.idxpack");

        let labels = vec![5u8, 0, 4];
        let images = ImageSet::new(1, 2, 2, vec![9, 8, 7, 6]);

        let mut writer = ArchiveWriter::create(&path).unwrap();
        writer.add_labels("training_labels", &labels).unwrap();
        writer.add_images("training_images", &images).unwrap();
        writer.finish().unwrap();

        let mut archive = DatasetArchive::open(&path).unwrap();
        assert_eq!(archive.manifest().datasets.len(), 2);

        let entry = archive.manifest().dataset("training_images").unwrap();
        assert_eq!(entry.shape, vec![1, 2, 2]);
        assert_eq!(entry.dtype, "u8");

        assert_eq!(archive.dataset("training_labels").unwrap(), labels);
        assert_eq!(archive.dataset("training_images").unwrap(), vec![9, 8, 7, 6]);
    }

    #[test]
    fn missing_dataset_is_reported_by_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.idxpack");

        let writer = ArchiveWriter::create(&path).unwrap();
        writer.finish().unwrap();

        let mut archive = DatasetArchive::open(&path).unwrap();
        let err = archive.dataset("test_labels").unwrap_err();
        assert!(matches!(err, Error::DatasetNotFound { name } if name == "test_labels"));
    }

    #[test]
    fn create_replaces_an_existing_archive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.idxpack");

        let mut writer = ArchiveWriter::create(&path).unwrap();
        writer.add_labels("training_labels", &[1, 2, 3]).unwrap();
        writer.finish().unwrap();

        // Second create starts from scratch
        let mut writer = ArchiveWriter::create(&path).unwrap();
        writer.add_labels("test_labels", &[4]).unwrap();
        writer.finish().unwrap();

        let mut archive = DatasetArchive::open(&path).unwrap();
        assert_eq!(archive.manifest().datasets.len(), 1);
        assert!(archive.manifest().dataset("training_labels").is_none());
        assert_eq!(archive.dataset("test_labels").unwrap(), vec![4]);
    }

    #[test]
    fn archive_without_manifest_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bare.zip");

        // A zip with no manifest entry at all
        let file = File::create(&path).unwrap();
        let mut zip = ZipWriter::new(file);
        zip.start_file("stray", SimpleFileOptions::default()).unwrap();
        zip.write_all(b"data").unwrap();
        zip.finish().unwrap();

        let err = DatasetArchive::open(&path).unwrap_err();
        assert!(matches!(err, Error::ManifestMissing { .. }));
    }
}

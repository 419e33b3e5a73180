use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use idxset::convert::{ConvertOptions, DATASET_NAMES, convert_dataset};
use idxset::prelude::*;

fn write_label_file(path: &Path, magic: i32, payload: &[u8]) {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&magic.to_be_bytes());
    bytes.extend_from_slice(&(payload.len() as i32).to_be_bytes());
    bytes.extend_from_slice(payload);
    fs::write(path, bytes).unwrap();
}

fn write_image_file(path: &Path, magic: i32, count: i32, rows: i32, cols: i32, payload: &[u8]) {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&magic.to_be_bytes());
    bytes.extend_from_slice(&count.to_be_bytes());
    bytes.extend_from_slice(&rows.to_be_bytes());
    bytes.extend_from_slice(&cols.to_be_bytes());
    bytes.extend_from_slice(payload);
    fs::write(path, bytes).unwrap();
}

/// Lay out a small synthetic dataset in the standard file structure.
fn write_dataset(data_dir: &Path) -> (Vec<u8>, Vec<u8>, Vec<u8>, Vec<u8>) {
    fs::create_dir_all(data_dir).unwrap();

    let train_labels = vec![5u8, 0, 4];
    let train_pixels: Vec<u8> = (0..12).collect(); // 3 records of 2x2
    let test_labels = vec![9u8, 1];
    let test_pixels: Vec<u8> = (100..108).collect(); // 2 records of 2x2

    write_label_file(
        &data_dir.join("train-labels.idx1-ubyte"),
        LABEL_MAGIC,
        &train_labels,
    );
    write_image_file(
        &data_dir.join("train-images.idx3-ubyte"),
        IMAGE_MAGIC,
        3,
        2,
        2,
        &train_pixels,
    );
    write_label_file(
        &data_dir.join("t10k-labels.idx1-ubyte"),
        LABEL_MAGIC,
        &test_labels,
    );
    write_image_file(
        &data_dir.join("t10k-images.idx3-ubyte"),
        IMAGE_MAGIC,
        2,
        2,
        2,
        &test_pixels,
    );

    (train_labels, train_pixels, test_labels, test_pixels)
}

fn small_options(root: &Path) -> ConvertOptions {
    let mut options = ConvertOptions::standard(root.join("data"), root.join("dataset.idxpack"));
    options.train_count = 3;
    options.test_count = 2;
    options.rows = 2;
    options.cols = 2;
    options
}

#[test]
fn full_pipeline_round_trips() {
    let root = tempdir().unwrap();
    let (train_labels, train_pixels, test_labels, test_pixels) =
        write_dataset(&root.path().join("data"));

    let options = small_options(root.path()).with_image_dir(root.path().join("img"));
    let summary = convert_dataset(&options).unwrap();

    assert_eq!(summary.train_label_count, 3);
    assert_eq!(summary.test_label_count, 2);
    assert_eq!(summary.train_image_shape, (3, 2, 2));
    assert_eq!(summary.test_image_shape, (2, 2, 2));
    assert_eq!(summary.export.unwrap().written, 5);

    // Every record became a PNG
    for i in 0..3 {
        assert!(root.path().join(format!("img/training/im_{i}.png")).exists());
    }
    for i in 0..2 {
        assert!(root.path().join(format!("img/test/im_{i}.png")).exists());
    }

    // The archive holds all four datasets under their standard names
    let mut archive = DatasetArchive::open(root.path().join("dataset.idxpack")).unwrap();
    let names: Vec<_> = archive
        .manifest()
        .datasets
        .iter()
        .map(|d| d.name.clone())
        .collect();
    assert_eq!(names, DATASET_NAMES);

    assert_eq!(archive.dataset("training_labels").unwrap(), train_labels);
    assert_eq!(archive.dataset("training_images").unwrap(), train_pixels);
    assert_eq!(archive.dataset("test_labels").unwrap(), test_labels);
    assert_eq!(archive.dataset("test_images").unwrap(), test_pixels);

    let entry = archive.manifest().dataset("training_images").unwrap();
    assert_eq!(entry.shape, vec![3, 2, 2]);
}

#[test]
fn rerun_skips_existing_exports_and_replaces_archive() {
    let root = tempdir().unwrap();
    write_dataset(&root.path().join("data"));

    let options = small_options(root.path()).with_image_dir(root.path().join("img"));

    let first = convert_dataset(&options).unwrap();
    assert_eq!(first.export.unwrap(), ExportSummary { written: 5, skipped: 0 });

    let before = fs::read(root.path().join("img/training/im_0.png")).unwrap();

    let second = convert_dataset(&options).unwrap();
    assert_eq!(second.export.unwrap(), ExportSummary { written: 0, skipped: 5 });

    // Existing exports are untouched, the archive is rewritten and valid
    let after = fs::read(root.path().join("img/training/im_0.png")).unwrap();
    assert_eq!(before, after);

    let mut archive = DatasetArchive::open(root.path().join("dataset.idxpack")).unwrap();
    assert_eq!(archive.dataset("test_labels").unwrap(), vec![9, 1]);
}

#[test]
fn mismatched_expectations_abort_before_the_archive_is_written() {
    let root = tempdir().unwrap();
    write_dataset(&root.path().join("data"));

    let mut options = small_options(root.path());
    options.train_count = 60000; // header says 3

    let err = convert_dataset(&options).unwrap_err();
    assert!(matches!(err, Error::CountMismatch { found: 3, .. }));
    assert!(!root.path().join("dataset.idxpack").exists());
}

#[test]
fn decoding_the_same_file_twice_is_deterministic() {
    let root = tempdir().unwrap();
    write_dataset(&root.path().join("data"));
    let path = root.path().join("data/train-images.idx3-ubyte");

    let first = read_images(&path, IMAGE_MAGIC, 3, 2, 2).unwrap();
    let second = read_images(&path, IMAGE_MAGIC, 3, 2, 2).unwrap();
    assert_eq!(first, second);
}

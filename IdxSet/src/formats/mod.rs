//! File format handlers

pub mod idx;

// Re-export the main format types for convenience
pub use idx::{ImageSet, read_images, read_labels};

use std::path::PathBuf;

use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to create face directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write face image {path}: {source}")]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Persists one image per student, replacing any earlier image.
pub trait FaceImageStore: Send + Sync {
    /// Returns where the image was written.
    fn save(&self, student_id: &str, image: &DynamicImage) -> Result<PathBuf, StoreError>;
}

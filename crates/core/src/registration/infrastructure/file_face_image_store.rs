use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};

use crate::registration::domain::face_image_store::{FaceImageStore, StoreError};

/// Writes face images as `<dir>/<student_id>.jpg`.
///
/// The directory is created on first save. Images are re-encoded as RGB
/// JPEG whatever format they arrived in.
pub struct FileFaceImageStore {
    dir: PathBuf,
}

impl FileFaceImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, student_id: &str) -> PathBuf {
        self.dir.join(format!("{student_id}.jpg"))
    }
}

impl FaceImageStore for FileFaceImageStore {
    fn save(&self, student_id: &str, image: &DynamicImage) -> Result<PathBuf, StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(student_id);
        // JPEG has no alpha channel
        image
            .to_rgb8()
            .save_with_format(&path, ImageFormat::Jpeg)
            .map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

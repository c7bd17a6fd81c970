use std::path::Path;

use rustface::ImageData;

use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
use crate::shared::detection_box::DetectionBox;
use crate::shared::frame::Frame;

/// Fixed classifier parameters for the funnel-structured cascade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorParams {
    pub min_face_size: u32,
    pub score_thresh: f64,
    pub pyramid_scale_factor: f32,
    pub slide_window_step: (u32, u32),
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            min_face_size: 40,
            score_thresh: 2.0,
            pyramid_scale_factor: 0.8,
            slide_window_step: (4, 4),
        }
    }
}

/// Face detector backed by `rustface` (SeetaFace cascade classifier).
///
/// Frames are converted to 8-bit luma before each scan.
pub struct RustfaceDetector {
    inner: Box<dyn rustface::Detector>,
    params: DetectorParams,
}

// Safety: the detector is owned by a single pipeline and only used from
// the pipeline thread.
unsafe impl Send for RustfaceDetector {}

impl RustfaceDetector {
    pub fn new(model_path: &Path, params: DetectorParams) -> Result<Self, DetectionError> {
        let path = model_path.to_string_lossy().into_owned();
        let mut inner = rustface::create_detector(&path).map_err(|e| DetectionError::Model {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        inner.set_min_face_size(params.min_face_size);
        inner.set_score_thresh(params.score_thresh);
        inner.set_pyramid_scale_factor(params.pyramid_scale_factor);
        inner.set_slide_window_step(params.slide_window_step.0, params.slide_window_step.1);

        log::info!("Loaded face model {path}");
        Ok(Self { inner, params })
    }

    pub fn params(&self) -> DetectorParams {
        self.params
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectionBox>, DetectionError> {
        let (width, height) = (frame.width(), frame.height());
        if width < self.params.min_face_size || height < self.params.min_face_size {
            return Err(DetectionError::FrameTooSmall { width, height });
        }

        let luma = frame.to_luma();
        let mut image = ImageData::new(&luma, width, height);
        let faces = self.inner.detect(&mut image);

        Ok(faces
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                DetectionBox::new(bbox.x(), bbox.y(), bbox.width(), bbox.height())
                    .clamp_to(width, height)
            })
            .collect())
    }
}

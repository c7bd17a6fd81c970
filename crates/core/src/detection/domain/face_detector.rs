use thiserror::Error;

use crate::shared::detection_box::DetectionBox;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("failed to load face model {path}: {reason}")]
    Model { path: String, reason: String },
    #[error("frame {width}x{height} is too small to scan")]
    FrameTooSmall { width: u32, height: u32 },
}

/// Domain interface for face localization.
///
/// Takes `&mut self` because classifier backends keep scratch buffers
/// between calls.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectionBox>, DetectionError>;
}

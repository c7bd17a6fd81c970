use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("failed to open camera {device}: {reason}")]
    Open { device: String, reason: String },
    #[error("camera is not open")]
    NotOpen,
    #[error("failed to capture frame: {0}")]
    Capture(String),
    #[error("failed to decode captured frame: {0}")]
    Decode(String),
}

/// A live frame source that must be acquired before use and released after.
///
/// The pipeline owns exactly one camera per session and guarantees
/// `release` is called once if `open` succeeded.
pub trait Camera: Send {
    fn open(&mut self) -> Result<(), CameraError>;

    /// Blocks until the next frame is available.
    fn capture(&mut self) -> Result<Frame, CameraError>;

    /// Returns the device to the system. Must be safe to call when not open.
    fn release(&mut self);
}

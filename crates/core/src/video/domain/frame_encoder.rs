use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("failed to encode frame {index}: {reason}")]
    Encode { index: usize, reason: String },
}

/// Compresses an RGB frame into a self-contained image payload.
pub trait FrameEncoder: Send {
    fn encode(&mut self, frame: &Frame) -> Result<Vec<u8>, EncodeError>;
}

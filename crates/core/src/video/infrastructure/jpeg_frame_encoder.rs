use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::shared::constants::DEFAULT_JPEG_QUALITY;
use crate::shared::frame::Frame;
use crate::video::domain::frame_encoder::{EncodeError, FrameEncoder};

/// Baseline JPEG encoding via the `image` crate.
pub struct JpegFrameEncoder {
    quality: u8,
    buf: Vec<u8>,
}

impl JpegFrameEncoder {
    /// `quality` is clamped to 1..=100.
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            buf: Vec::new(),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegFrameEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl FrameEncoder for JpegFrameEncoder {
    fn encode(&mut self, frame: &Frame) -> Result<Vec<u8>, EncodeError> {
        self.buf.clear();
        JpegEncoder::new_with_quality(&mut self.buf, self.quality)
            .encode(
                frame.data(),
                frame.width(),
                frame.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| EncodeError::Encode {
                index: frame.index(),
                reason: e.to_string(),
            })?;
        Ok(self.buf.clone())
    }
}

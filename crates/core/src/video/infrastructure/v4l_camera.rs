use image::ImageFormat;

use crate::shared::constants::{DEFAULT_CAMERA_DEVICE, DEFAULT_FRAME_INTERVAL, DEFAULT_RESOLUTION};
use crate::shared::frame::Frame;
use crate::video::domain::camera::{Camera, CameraError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraSettings {
    pub device: String,
    pub resolution: (u32, u32),
    /// Seconds per frame as a fraction, e.g. `(1, 30)`.
    pub interval: (u32, u32),
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device: DEFAULT_CAMERA_DEVICE.to_string(),
            resolution: DEFAULT_RESOLUTION,
            interval: DEFAULT_FRAME_INTERVAL,
        }
    }
}

/// V4L2 capture through `rscam`, requesting MJPG from the driver and
/// decoding each frame to RGB.
pub struct V4lCamera {
    settings: CameraSettings,
    camera: Option<rscam::Camera>,
    next_index: usize,
}

impl V4lCamera {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            camera: None,
            next_index: 0,
        }
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn is_open(&self) -> bool {
        self.camera.is_some()
    }

    fn open_error(&self, reason: impl ToString) -> CameraError {
        CameraError::Open {
            device: self.settings.device.clone(),
            reason: reason.to_string(),
        }
    }
}

impl Camera for V4lCamera {
    fn open(&mut self) -> Result<(), CameraError> {
        if self.camera.is_some() {
            return Ok(());
        }

        let mut camera =
            rscam::Camera::new(&self.settings.device).map_err(|e| self.open_error(e))?;
        camera
            .start(&rscam::Config {
                interval: self.settings.interval,
                resolution: self.settings.resolution,
                format: b"MJPG",
                nbuffers: 2,
                field: rscam::FIELD_NONE,
            })
            .map_err(|e| self.open_error(e))?;

        log::info!(
            "Opened camera {} at {}x{}",
            self.settings.device,
            self.settings.resolution.0,
            self.settings.resolution.1
        );
        self.camera = Some(camera);
        self.next_index = 0;
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let camera = self.camera.as_ref().ok_or(CameraError::NotOpen)?;
        let raw = camera
            .capture()
            .map_err(|e| CameraError::Capture(e.to_string()))?;

        let rgb = image::load_from_memory_with_format(&raw[..], ImageFormat::Jpeg)
            .map_err(|e| CameraError::Decode(e.to_string()))?
            .to_rgb8();

        let frame = Frame::from_rgb_image(rgb, self.next_index);
        self.next_index += 1;
        Ok(frame)
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop() {
                log::warn!("Failed to stop camera {}: {e}", self.settings.device);
            }
            log::info!("Released camera {}", self.settings.device);
        }
    }
}

impl Drop for V4lCamera {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = CameraSettings::default();
        assert_eq!(settings.device, "/dev/video0");
        assert_eq!(settings.resolution, (640, 480));
        assert_eq!(settings.interval, (1, 30));
    }

    #[test]
    fn test_capture_before_open_fails() {
        let mut camera = V4lCamera::new(CameraSettings::default());
        assert!(matches!(camera.capture(), Err(CameraError::NotOpen)));
    }

    #[test]
    fn test_open_missing_device_fails() {
        let mut camera = V4lCamera::new(CameraSettings {
            device: "/dev/no-such-video-device".into(),
            ..CameraSettings::default()
        });
        let err = camera.open().unwrap_err();
        assert!(matches!(err, CameraError::Open { .. }));
        assert!(!camera.is_open());
    }

    #[test]
    fn test_release_when_closed_is_noop() {
        let mut camera = V4lCamera::new(CameraSettings::default());
        camera.release();
        camera.release();
        assert!(!camera.is_open());
    }
}

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use attendance_core::attendance::domain::attendance_ledger::AttendanceLedger;
use attendance_core::detection::infrastructure::rustface_detector::{
    DetectorParams, RustfaceDetector,
};
use attendance_core::pipeline::camera_lease::CameraLease;
use attendance_core::pipeline::frame_annotator::FrameAnnotator;
use attendance_core::pipeline::frame_pipeline::{FramePipeline, PipelineConfig, SessionServices};
use attendance_core::recognition::infrastructure::simulated_resolver::SimulatedIdentityResolver;
use attendance_core::registration::domain::face_image_store::FaceImageStore;
use attendance_core::registration::domain::face_registry::FaceRegistry;
use attendance_core::registration::infrastructure::file_face_image_store::FileFaceImageStore;
use attendance_core::registration::register_face_use_case::RegisterFaceUseCase;
use attendance_core::shared::clock::{Clock, SystemClock};
use attendance_core::video::infrastructure::jpeg_frame_encoder::JpegFrameEncoder;
use attendance_core::video::infrastructure::v4l_camera::{CameraSettings, V4lCamera};
use chrono::TimeDelta;

use crate::settings::Settings;

pub type BuildError = Box<dyn std::error::Error + Send + Sync>;

/// Builds one fresh pipeline per `/video_feed` session.
pub trait PipelineFactory: Send + Sync {
    fn create(&self) -> Result<FramePipeline, BuildError>;
}

/// Live camera + cascade detector + JPEG encoder.
pub struct CameraPipelineFactory {
    camera: CameraSettings,
    model_path: PathBuf,
    jpeg_quality: u8,
    services: SessionServices,
    config: PipelineConfig,
}

impl PipelineFactory for CameraPipelineFactory {
    fn create(&self) -> Result<FramePipeline, BuildError> {
        let detector = RustfaceDetector::new(&self.model_path, DetectorParams::default())?;
        Ok(FramePipeline::new(
            Box::new(V4lCamera::new(self.camera.clone())),
            Box::new(detector),
            Box::new(JpegFrameEncoder::new(self.jpeg_quality)),
            self.services.clone(),
            self.config.clone(),
        ))
    }
}

/// Everything the handlers share. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<AttendanceLedger>,
    pub registry: Arc<FaceRegistry>,
    pub register: Arc<RegisterFaceUseCase>,
    pub lease: Arc<CameraLease>,
    pub pipelines: Arc<dyn PipelineFactory>,
    pub clock: Arc<dyn Clock>,
    /// Set on shutdown; running pipelines stop at their next frame.
    pub cancelled: Arc<AtomicBool>,
}

impl AppState {
    pub fn from_settings(
        settings: &Settings,
        model_path: PathBuf,
        annotator: FrameAnnotator,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let ledger = Arc::new(AttendanceLedger::new(TimeDelta::seconds(
            settings.cooldown_secs,
        )));

        let services = SessionServices {
            resolver: Arc::new(SimulatedIdentityResolver::new(settings.roster.clone())),
            ledger: ledger.clone(),
            annotator: Arc::new(annotator),
            clock: clock.clone(),
        };
        let factory = CameraPipelineFactory {
            camera: CameraSettings {
                device: settings.camera_device.clone(),
                resolution: settings.resolution,
                interval: settings.frame_interval,
            },
            model_path,
            jpeg_quality: settings.jpeg_quality,
            services,
            config: PipelineConfig {
                course: settings.course.clone(),
                frame_delay: Duration::from_millis(settings.frame_delay_ms),
            },
        };

        Self::new(
            ledger,
            Box::new(FileFaceImageStore::new(&settings.faces_dir)),
            Arc::new(factory),
            clock,
        )
    }

    pub fn new(
        ledger: Arc<AttendanceLedger>,
        store: Box<dyn FaceImageStore>,
        pipelines: Arc<dyn PipelineFactory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let registry = Arc::new(FaceRegistry::new());
        let register = RegisterFaceUseCase::new(store, registry.clone(), clock.clone());
        Self {
            ledger,
            registry,
            register: Arc::new(register),
            lease: CameraLease::new(),
            pipelines,
            clock,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

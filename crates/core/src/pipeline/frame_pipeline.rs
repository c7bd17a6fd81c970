use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::attendance::domain::attendance_ledger::AttendanceLedger;
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::frame_annotator::FrameAnnotator;
use crate::pipeline::multipart::jpeg_part;
use crate::pipeline::pipeline_logger::{LogPipelineLogger, PipelineLogger};
use crate::recognition::domain::identity_resolver::IdentityResolver;
use crate::shared::clock::Clock;
use crate::shared::constants::{DEFAULT_COURSE, DEFAULT_FRAME_DELAY_MS};
use crate::video::domain::camera::{Camera, CameraError};
use crate::video::domain::frame_encoder::{EncodeError, FrameEncoder};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("camera could not be opened: {0}")]
    CameraOpen(#[source] CameraError),
    #[error("frame capture failed: {0}")]
    Capture(#[source] CameraError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("pipeline has not been opened")]
    NotOpen,
    #[error("pipeline is closed")]
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Opened,
    Streaming,
    Closed,
}

/// Consumer of encoded multipart parts.
pub trait FrameSink {
    /// Returns `false` once the consumer is gone.
    fn send(&mut self, part: Vec<u8>) -> bool;
}

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub course: String,
    /// Pause after each emitted frame.
    pub frame_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            course: DEFAULT_COURSE.to_string(),
            frame_delay: Duration::from_millis(DEFAULT_FRAME_DELAY_MS),
        }
    }
}

/// Process-wide collaborators every streaming session shares.
#[derive(Clone)]
pub struct SessionServices {
    pub resolver: Arc<dyn IdentityResolver>,
    pub ledger: Arc<AttendanceLedger>,
    pub annotator: Arc<FrameAnnotator>,
    pub clock: Arc<dyn Clock>,
}

/// One camera streaming session:
/// capture → detect → resolve → admit → annotate → encode → frame.
///
/// `Idle -> Opened -> Streaming -> Closed`. `Closed` is terminal and the
/// camera is released exactly once if it was ever acquired, including when
/// the pipeline is dropped mid-stream.
pub struct FramePipeline {
    camera: Box<dyn Camera>,
    detector: Box<dyn FaceDetector>,
    encoder: Box<dyn FrameEncoder>,
    services: SessionServices,
    config: PipelineConfig,
    logger: Box<dyn PipelineLogger>,
    state: PipelineState,
    camera_acquired: bool,
    frames_emitted: usize,
}

impl FramePipeline {
    pub fn new(
        camera: Box<dyn Camera>,
        detector: Box<dyn FaceDetector>,
        encoder: Box<dyn FrameEncoder>,
        services: SessionServices,
        config: PipelineConfig,
    ) -> Self {
        Self {
            camera,
            detector,
            encoder,
            services,
            config,
            logger: Box::new(LogPipelineLogger::default()),
            state: PipelineState::Idle,
            camera_acquired: false,
            frames_emitted: 0,
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn frames_emitted(&self) -> usize {
        self.frames_emitted
    }

    pub fn open(&mut self) -> Result<(), PipelineError> {
        match self.state {
            PipelineState::Idle => {}
            PipelineState::Closed => return Err(PipelineError::Closed),
            PipelineState::Opened | PipelineState::Streaming => return Ok(()),
        }

        if let Err(e) = self.camera.open() {
            self.close();
            return Err(PipelineError::CameraOpen(e));
        }
        self.camera_acquired = true;
        self.state = PipelineState::Opened;
        Ok(())
    }

    /// Produces the next multipart part. Capture and encode failures close
    /// the pipeline. Detection failures degrade to an unannotated frame.
    pub fn process_next(&mut self) -> Result<Vec<u8>, PipelineError> {
        match self.state {
            PipelineState::Opened | PipelineState::Streaming => {}
            PipelineState::Idle => return Err(PipelineError::NotOpen),
            PipelineState::Closed => return Err(PipelineError::Closed),
        }

        let t0 = Instant::now();
        let frame = match self.camera.capture() {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("Camera capture failed: {e}");
                self.close();
                return Err(PipelineError::Capture(e));
            }
        };
        self.logger.timing("capture", elapsed_ms(t0));

        let t0 = Instant::now();
        let boxes = match self.detector.detect(&frame) {
            Ok(boxes) => boxes,
            Err(e) => {
                log::warn!("Face detection failed on frame {}: {e}", frame.index());
                Vec::new()
            }
        };
        self.logger.timing("detect", elapsed_ms(t0));
        self.logger.metric("faces", boxes.len() as f64);

        let now = self.services.clock.now();
        let label = self.services.resolver.resolve(now, boxes.len());
        if let Some(name) = &label {
            let admitted = self
                .services
                .ledger
                .try_admit(name, &now, &self.config.course);
            if admitted {
                log::info!("Marked attendance for {name}");
            }
            self.logger.metric("admitted", if admitted { 1.0 } else { 0.0 });
        }

        let t0 = Instant::now();
        let frame = self
            .services
            .annotator
            .annotate(frame, &boxes, label.as_deref(), &now);
        self.logger.timing("annotate", elapsed_ms(t0));

        let t0 = Instant::now();
        let jpeg = match self.encoder.encode(&frame) {
            Ok(jpeg) => jpeg,
            Err(e) => {
                log::error!("{e}");
                self.close();
                return Err(PipelineError::Encode(e));
            }
        };
        self.logger.timing("encode", elapsed_ms(t0));

        self.state = PipelineState::Streaming;
        Ok(jpeg_part(&jpeg))
    }

    /// Idempotent. Releases the camera if this session acquired it.
    pub fn close(&mut self) {
        if self.state == PipelineState::Closed {
            return;
        }
        if self.camera_acquired {
            self.camera.release();
            self.camera_acquired = false;
        }
        self.state = PipelineState::Closed;
        if self.frames_emitted > 0 {
            self.logger.summary();
        }
    }

    /// Opens the camera and streams parts into `sink` until the consumer
    /// goes away, `cancelled` is set, or a stage fails. Always leaves the
    /// pipeline closed. Returns the number of parts delivered.
    pub fn run(
        &mut self,
        sink: &mut dyn FrameSink,
        cancelled: &AtomicBool,
    ) -> Result<usize, PipelineError> {
        let result = self.stream(sink, cancelled);
        self.close();
        result
    }

    fn stream(
        &mut self,
        sink: &mut dyn FrameSink,
        cancelled: &AtomicBool,
    ) -> Result<usize, PipelineError> {
        self.open()?;
        self.logger.info("Stream session opened");

        while !cancelled.load(Ordering::Relaxed) {
            let part = self.process_next()?;
            if !sink.send(part) {
                self.logger.info("Stream consumer disconnected");
                break;
            }
            self.frames_emitted += 1;
            self.logger.progress(self.frames_emitted);

            if !self.config.frame_delay.is_zero() {
                std::thread::sleep(self.config.frame_delay);
            }
        }

        self.logger.info(&format!(
            "Stream session closed after {} frames",
            self.frames_emitted
        ));
        Ok(self.frames_emitted)
    }
}

impl Drop for FramePipeline {
    fn drop(&mut self) {
        self.close();
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use attendance_core::pipeline::camera_lease::LeaseGuard;
use attendance_core::pipeline::frame_pipeline::{FramePipeline, FrameSink};
use axum::body::Body;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

/// Parts in flight between the capture thread and the HTTP body.
const CHANNEL_CAPACITY: usize = 1;
/// How often a stalled send rechecks for shutdown.
const SEND_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Holds the capture thread until the body has room for the next part,
/// the body is dropped, or shutdown is requested.
struct ChannelSink {
    tx: mpsc::Sender<Vec<u8>>,
    cancelled: Arc<AtomicBool>,
}

impl FrameSink for ChannelSink {
    fn send(&mut self, part: Vec<u8>) -> bool {
        let mut part = part;
        loop {
            match self.tx.try_send(part) {
                Ok(()) => return true,
                Err(TrySendError::Closed(_)) => return false,
                Err(TrySendError::Full(back)) => {
                    if self.cancelled.load(Ordering::Relaxed) {
                        return false;
                    }
                    part = back;
                    thread::sleep(SEND_POLL_INTERVAL);
                }
            }
        }
    }
}

/// Runs `pipeline` on a blocking thread and returns the response body fed
/// by it. The lease is held until the pipeline has released the camera.
pub fn spawn_stream(pipeline: FramePipeline, lease: LeaseGuard, cancelled: Arc<AtomicBool>) -> Body {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    tokio::task::spawn_blocking(move || {
        let _lease = lease;
        let mut pipeline = pipeline;
        let mut sink = ChannelSink {
            tx,
            cancelled: cancelled.clone(),
        };
        match pipeline.run(&mut sink, &cancelled) {
            Ok(frames) => log::info!("Video feed finished after {frames} frames"),
            Err(e) => log::error!("Video feed stopped: {e}"),
        }
    });

    Body::from_stream(ReceiverStream::new(rx).map(Ok::<_, Infallible>))
}

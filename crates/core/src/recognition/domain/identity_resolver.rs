use chrono::{DateTime, Local};

/// Domain interface for turning a frame's detections into an identity.
///
/// Called once per processed frame, not once per box. Returns at most one
/// identity per frame. A real recognizer can replace the simulated one
/// without touching the ledger or the pipeline.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, now: DateTime<Local>, detection_count: usize) -> Option<String>;
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Single-holder token for the one physical camera.
///
/// A streaming session holds a [`LeaseGuard`] for its whole lifetime; the
/// lease frees itself when the guard drops.
#[derive(Debug, Default)]
pub struct CameraLease {
    held: AtomicBool,
}

impl CameraLease {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns `None` while another session holds the camera.
    pub fn try_acquire(self: &Arc<Self>) -> Option<LeaseGuard> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LeaseGuard {
                lease: Arc::clone(self),
            })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct LeaseGuard {
    lease: Arc<CameraLease>,
}

impl Drop for LeaseGuard {
    fn drop(&mut self) {
        self.lease.held.store(false, Ordering::Release);
    }
}

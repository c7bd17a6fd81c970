pub const FACE_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";
pub const FACE_MODEL_URL: &str =
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin";

/// Minimum gap before the same identity is admitted again.
pub const DEFAULT_COOLDOWN_SECS: i64 = 60;

pub const DEFAULT_COURSE: &str = "Introduction to Computer Science";

pub const DEFAULT_ROSTER: &[&str] = &["John Doe", "Sarah Johnson", "Michael Brown"];

/// Pause between emitted frames (~10 fps).
pub const DEFAULT_FRAME_DELAY_MS: u64 = 100;

pub const DEFAULT_JPEG_QUALITY: u8 = 80;

pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";
pub const DEFAULT_RESOLUTION: (u32, u32) = (640, 480);
pub const DEFAULT_FRAME_INTERVAL: (u32, u32) = (1, 30);

pub const MULTIPART_BOUNDARY: &str = "frame";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

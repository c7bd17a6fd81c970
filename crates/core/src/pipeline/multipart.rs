use crate::shared::constants::MULTIPART_BOUNDARY;

/// Wraps one JPEG payload as a `multipart/x-mixed-replace` part:
/// `--frame\r\nContent-Type: image/jpeg\r\n\r\n<jpeg>\r\n`.
pub fn jpeg_part(jpeg: &[u8]) -> Vec<u8> {
    let head = format!("--{MULTIPART_BOUNDARY}\r\nContent-Type: image/jpeg\r\n\r\n");
    let mut part = Vec::with_capacity(head.len() + jpeg.len() + 2);
    part.extend_from_slice(head.as_bytes());
    part.extend_from_slice(jpeg);
    part.extend_from_slice(b"\r\n");
    part
}

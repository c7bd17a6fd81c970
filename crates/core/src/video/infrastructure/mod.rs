pub mod jpeg_frame_encoder;
pub mod v4l_camera;

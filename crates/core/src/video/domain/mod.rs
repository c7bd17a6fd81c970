pub mod camera;
pub mod frame_encoder;

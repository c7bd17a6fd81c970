pub mod camera_lease;
pub mod frame_annotator;
pub mod frame_pipeline;
pub mod multipart;
pub mod pipeline_logger;

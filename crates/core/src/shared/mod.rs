pub mod clock;
pub mod constants;
pub mod detection_box;
pub mod frame;

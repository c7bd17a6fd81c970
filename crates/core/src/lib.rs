pub mod attendance;
pub mod detection;
pub mod pipeline;
pub mod recognition;
pub mod registration;
pub mod shared;
pub mod video;

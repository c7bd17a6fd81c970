pub mod face_image_store;
pub mod face_registry;
pub mod registered_face;

pub mod domain;
pub mod infrastructure;
pub mod register_face_use_case;

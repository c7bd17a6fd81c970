pub mod file_face_image_store;

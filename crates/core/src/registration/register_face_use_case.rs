use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::registration::domain::face_image_store::{FaceImageStore, StoreError};
use crate::registration::domain::face_registry::FaceRegistry;
use crate::registration::domain::registered_face::RegisteredFace;
use crate::shared::clock::{wall_time, Clock};

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("invalid student id {0:?}: must be a plain file name")]
    InvalidStudentId(String),
    #[error("invalid request body: {0}")]
    MalformedBody(String),
    #[error("invalid base64 image data: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("could not decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Registration payload as posted by the front end. Every field is optional
/// at the wire level so absence is reported as `MissingFields`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterFaceRequest {
    #[serde(deserialize_with = "text_or_integer")]
    pub student_id: Option<String>,
    pub name: Option<String>,
    pub image_data: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdText {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

/// Integer ids are taken as their decimal text.
fn text_or_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<IdText>::deserialize(deserializer)?.map(|id| match id {
        IdText::Text(text) => text,
        IdText::Signed(n) => n.to_string(),
        IdText::Unsigned(n) => n.to_string(),
    }))
}

/// Validate → decode → store image → upsert registry.
pub struct RegisterFaceUseCase {
    store: Box<dyn FaceImageStore>,
    registry: Arc<FaceRegistry>,
    clock: Arc<dyn Clock>,
}

impl RegisterFaceUseCase {
    pub fn new(
        store: Box<dyn FaceImageStore>,
        registry: Arc<FaceRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            registry,
            clock,
        }
    }

    pub fn registry(&self) -> &Arc<FaceRegistry> {
        &self.registry
    }

    pub fn execute(&self, request: RegisterFaceRequest) -> Result<RegisteredFace, RegistrationError> {
        let (student_id, name, image_data) = match (
            non_empty(request.student_id),
            non_empty(request.name),
            non_empty(request.image_data),
        ) {
            (Some(id), Some(name), Some(data)) => (id, name, data),
            _ => return Err(RegistrationError::MissingFields),
        };

        if !is_plain_file_name(&student_id) {
            return Err(RegistrationError::InvalidStudentId(student_id));
        }

        let bytes = decode_image_data(&image_data)?;
        let image = image::load_from_memory(&bytes)?;
        let path = self.store.save(&student_id, &image)?;

        let face = RegisteredFace::new(student_id, name, wall_time(&self.clock.now()));
        if self.registry.upsert(face.clone()).is_some() {
            log::info!(
                "Re-registered {} ({}) at {}",
                face.name(),
                face.student_id(),
                path.display()
            );
        } else {
            log::info!(
                "Registered {} ({}) at {}",
                face.name(),
                face.student_id(),
                path.display()
            );
        }
        Ok(face)
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

fn is_plain_file_name(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\', '\0'])
}

/// Accepts raw base64 or a `data:<mime>;base64,<payload>` URL. Whitespace
/// inside the payload is ignored.
fn decode_image_data(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let payload = match data.split_once(',') {
        Some((_, rest)) => rest,
        None => data,
    };
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact)
}

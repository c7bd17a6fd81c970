use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::registered_face::RegisteredFace;

/// In-memory map of registered students keyed by `student_id`.
#[derive(Default)]
pub struct FaceRegistry {
    faces: RwLock<HashMap<String, RegisteredFace>>,
}

impl FaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `face.student_id()`. Returns the
    /// entry it replaced, if any.
    pub fn upsert(&self, face: RegisteredFace) -> Option<RegisteredFace> {
        self.faces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(face.student_id().to_string(), face)
    }

    pub fn get(&self, student_id: &str) -> Option<RegisteredFace> {
        self.faces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(student_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.faces.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all entries sorted by student id.
    pub fn entries(&self) -> Vec<RegisteredFace> {
        let mut entries: Vec<RegisteredFace> = self
            .faces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.student_id().cmp(b.student_id()));
        entries
    }
}

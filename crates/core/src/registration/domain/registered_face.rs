use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::shared::clock::format_iso8601;

/// A student whose face image has been stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisteredFace {
    student_id: String,
    name: String,
    #[serde(serialize_with = "serialize_time")]
    registered_at: NaiveDateTime,
}

impl RegisteredFace {
    pub fn new(
        student_id: impl Into<String>,
        name: impl Into<String>,
        registered_at: NaiveDateTime,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            registered_at,
        }
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registered_at(&self) -> NaiveDateTime {
        self.registered_at
    }
}

fn serialize_time<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_iso8601(time))
}

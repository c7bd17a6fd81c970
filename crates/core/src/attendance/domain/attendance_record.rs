use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::shared::clock::format_iso8601;

/// One admitted attendance entry. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    name: String,
    #[serde(serialize_with = "serialize_time")]
    time: NaiveDateTime,
    course: String,
}

impl AttendanceRecord {
    pub fn new(name: impl Into<String>, time: NaiveDateTime, course: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time,
            course: course.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    pub fn course(&self) -> &str {
        &self.course
    }
}

fn serialize_time<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_iso8601(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_serializes_with_iso8601_time() {
        let time = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let record = AttendanceRecord::new("Bob", time, "CS");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Bob", "time": "2024-01-01T10:00:00", "course": "CS"})
        );
    }
}

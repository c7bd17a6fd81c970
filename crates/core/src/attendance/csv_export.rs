use chrono::NaiveDate;

use super::domain::attendance_record::AttendanceRecord;
use crate::shared::clock::format_iso8601;

pub const CSV_HEADER: &str = "Name,Time,Course";

/// Renders records as CSV: a `Name,Time,Course` header, then one
/// `\n`-terminated row per record in the given order.
///
/// Fields are written verbatim unless they contain a delimiter, quote or
/// line break, in which case they are quoted with inner quotes doubled.
pub fn export_csv(records: &[AttendanceRecord]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + records.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for record in records {
        push_field(&mut out, record.name());
        out.push(',');
        push_field(&mut out, &format_iso8601(&record.time()));
        out.push(',');
        push_field(&mut out, record.course());
        out.push('\n');
    }
    out
}

/// `attendance-<YYYY-MM-DD>.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("attendance-{}.csv", date.format("%Y-%m-%d"))
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_empty_ledger_is_header_only() {
        assert_eq!(export_csv(&[]), "Name,Time,Course\n");
    }

    #[test]
    fn test_single_record() {
        let records = [AttendanceRecord::new("Bob", at(10, 0, 0), "CS")];
        assert_eq!(
            export_csv(&records),
            "Name,Time,Course\nBob,2024-01-01T10:00:00,CS\n"
        );
    }

    #[test]
    fn test_rows_keep_ledger_order() {
        let records = [
            AttendanceRecord::new("Zed", at(9, 0, 0), "CS"),
            AttendanceRecord::new("Amy", at(9, 1, 0), "CS"),
        ];
        let csv = export_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Zed,"));
        assert!(lines[2].starts_with("Amy,"));
    }

    #[test]
    fn test_quotes_fields_with_delimiters() {
        let records = [AttendanceRecord::new(
            "Doe, John",
            at(10, 0, 0),
            "Intro \"CS\"",
        )];
        assert_eq!(
            export_csv(&records),
            "Name,Time,Course\n\"Doe, John\",2024-01-01T10:00:00,\"Intro \"\"CS\"\"\"\n"
        );
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_filename(date), "attendance-2024-03-07.csv");
    }
}

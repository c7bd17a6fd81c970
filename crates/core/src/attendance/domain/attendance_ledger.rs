use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use super::attendance_record::AttendanceRecord;
use crate::shared::clock::wall_time;
use crate::shared::constants::DEFAULT_COOLDOWN_SECS;

struct Entry {
    record: AttendanceRecord,
    admitted_at: DateTime<Utc>,
}

/// Append-only, in-memory attendance log shared by the frame pipeline
/// (writer) and HTTP readers.
///
/// Insertion order is chronological. Records are never edited or removed,
/// so `len` only grows. Records carry local wall time for display; the
/// cooldown is measured on the absolute instant, so a DST fall-back does
/// not lock identities out.
pub struct AttendanceLedger {
    entries: RwLock<Vec<Entry>>,
    cooldown: TimeDelta,
}

impl AttendanceLedger {
    pub fn new(cooldown: TimeDelta) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            cooldown,
        }
    }

    pub fn cooldown(&self) -> TimeDelta {
        self.cooldown
    }

    /// Appends `(name, now, course)` unless `name` was admitted less than
    /// one cooldown before `now`. Returns whether a record was appended.
    ///
    /// Only the most recent record for `name` is consulted. A `now` earlier
    /// than that record counts as inside the window.
    pub fn try_admit<Tz: TimeZone>(&self, name: &str, now: &DateTime<Tz>, course: &str) -> bool {
        let instant = now.with_timezone(&Utc);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        let latest = entries.iter().rev().find(|e| e.record.name() == name);
        if let Some(latest) = latest {
            if instant - latest.admitted_at < self.cooldown {
                return false;
            }
        }

        entries.push(Entry {
            record: AttendanceRecord::new(name, wall_time(now), course),
            admitted_at: instant,
        });
        true
    }

    /// Snapshot of all records in admission order.
    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|e| e.record.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AttendanceLedger {
    fn default() -> Self {
        Self::new(TimeDelta::seconds(DEFAULT_COOLDOWN_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};
    use rstest::rstest;
    use std::sync::Arc;
    use std::thread;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    fn secs(s: i64) -> TimeDelta {
        TimeDelta::seconds(s)
    }

    #[test]
    fn test_starts_empty() {
        let ledger = AttendanceLedger::default();
        assert!(ledger.is_empty());
        assert_eq!(ledger.cooldown(), secs(60));
    }

    #[test]
    fn test_first_admission_appends() {
        let ledger = AttendanceLedger::default();
        assert!(ledger.try_admit("Alice", &t0(), "CS"));
        assert_eq!(ledger.records(), vec![AttendanceRecord::new("Alice", t0().naive_utc(), "CS")]);
    }

    #[rstest]
    #[case::same_instant(0, false)]
    #[case::one_second(1_000, false)]
    #[case::just_inside(59_999, false)]
    #[case::exact_window(60_000, true)]
    #[case::well_after(3_600_000, true)]
    fn test_cooldown_window(#[case] gap_ms: i64, #[case] admitted: bool) {
        let ledger = AttendanceLedger::default();
        assert!(ledger.try_admit("Alice", &t0(), "CS"));

        let later = t0() + TimeDelta::milliseconds(gap_ms);
        assert_eq!(ledger.try_admit("Alice", &later, "CS"), admitted);
        assert_eq!(ledger.len(), if admitted { 2 } else { 1 });
    }

    #[test]
    fn test_rejection_does_not_mutate() {
        let ledger = AttendanceLedger::default();
        ledger.try_admit("Alice", &t0(), "CS");
        let before = ledger.records();

        assert!(!ledger.try_admit("Alice", &(t0() + secs(10)), "Other course"));
        assert_eq!(ledger.records(), before);
    }

    #[test]
    fn test_names_have_independent_windows() {
        let ledger = AttendanceLedger::default();
        assert!(ledger.try_admit("Alice", &t0(), "CS"));
        assert!(ledger.try_admit("Bob", &(t0() + secs(1)), "CS"));
        assert!(!ledger.try_admit("Alice", &(t0() + secs(2)), "CS"));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_checks_most_recent_record_only() {
        let ledger = AttendanceLedger::default();
        assert!(ledger.try_admit("Alice", &t0(), "CS"));
        assert!(ledger.try_admit("Alice", &(t0() + secs(61)), "CS"));
        // inside the window of the second record
        assert!(!ledger.try_admit("Alice", &(t0() + secs(62)), "CS"));
        // outside both windows
        assert!(ledger.try_admit("Alice", &(t0() + secs(122)), "CS"));
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_clock_going_backwards_rejects() {
        let ledger = AttendanceLedger::default();
        assert!(ledger.try_admit("Alice", &t0(), "CS"));
        assert!(!ledger.try_admit("Alice", &(t0() - secs(300)), "CS"));
    }

    #[test]
    fn test_dst_fall_back_uses_elapsed_time() {
        let summer = FixedOffset::west_opt(4 * 3600).unwrap();
        let winter = FixedOffset::west_opt(5 * 3600).unwrap();
        let first = summer.with_ymd_and_hms(2024, 11, 3, 1, 59, 30).unwrap();
        // wall clock reads earlier, but 70 s have passed
        let second = winter.with_ymd_and_hms(2024, 11, 3, 1, 0, 40).unwrap();

        let ledger = AttendanceLedger::default();
        assert!(ledger.try_admit("Alice", &first, "CS"));
        assert!(ledger.try_admit("Alice", &second, "CS"));

        let times: Vec<_> = ledger.records().iter().map(|r| r.time()).collect();
        let day = NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();
        assert_eq!(
            times,
            vec![
                day.and_hms_opt(1, 59, 30).unwrap(),
                day.and_hms_opt(1, 0, 40).unwrap()
            ]
        );
    }

    #[test]
    fn test_dst_fall_back_still_enforces_cooldown() {
        let summer = FixedOffset::west_opt(4 * 3600).unwrap();
        let winter = FixedOffset::west_opt(5 * 3600).unwrap();
        let first = summer.with_ymd_and_hms(2024, 11, 3, 1, 59, 50).unwrap();
        let second = winter.with_ymd_and_hms(2024, 11, 3, 1, 0, 20).unwrap();

        let ledger = AttendanceLedger::default();
        assert!(ledger.try_admit("Alice", &first, "CS"));
        assert!(!ledger.try_admit("Alice", &second, "CS"));
    }

    #[test]
    fn test_custom_cooldown() {
        let ledger = AttendanceLedger::new(secs(5));
        assert!(ledger.try_admit("Alice", &t0(), "CS"));
        assert!(!ledger.try_admit("Alice", &(t0() + secs(4)), "CS"));
        assert!(ledger.try_admit("Alice", &(t0() + secs(5)), "CS"));
    }

    #[test]
    fn test_len_is_monotonic_and_records_preserved() {
        let ledger = AttendanceLedger::default();
        let names = ["A", "B", "A", "C", "B", "A"];
        let mut last_len = 0;
        let mut snapshot: Vec<AttendanceRecord> = Vec::new();

        for (i, name) in names.iter().enumerate() {
            ledger.try_admit(name, &(t0() + secs(i as i64 * 30)), "CS");
            let records = ledger.records();
            assert!(records.len() >= last_len);
            assert_eq!(&records[..snapshot.len()], &snapshot[..]);
            last_len = records.len();
            snapshot = records;
        }
    }

    #[test]
    fn test_concurrent_admissions_respect_cooldown() {
        let ledger = Arc::new(AttendanceLedger::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = ledger.clone();
                thread::spawn(move || ledger.try_admit("Alice", &t0(), "CS"))
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&ok| ok)
            .count();
        assert_eq!(admitted, 1);
        assert_eq!(ledger.len(), 1);
    }
}

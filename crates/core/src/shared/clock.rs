use chrono::{DateTime, Local, NaiveDateTime, SubsecRound, TimeZone};

/// Source of wall-clock time.
///
/// The pipeline and use cases read time through this port so tests can
/// pin it.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Local wall time as stored in records: timezone dropped, microsecond
/// precision.
pub fn wall_time<Tz: TimeZone>(now: &DateTime<Tz>) -> NaiveDateTime {
    now.naive_local().trunc_subsecs(6)
}

/// ISO-8601 text used for every record timestamp on the wire.
///
/// Fractional seconds are omitted when zero.
pub fn format_iso8601(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

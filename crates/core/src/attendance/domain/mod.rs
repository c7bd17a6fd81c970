pub mod attendance_ledger;
pub mod attendance_record;

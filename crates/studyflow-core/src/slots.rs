//! Slot codec: absolute datetimes to and from integer slot indices.
//!
//! The optimizer works on a flat timeline of fixed 30-minute slots, 48 per
//! day, where slot 0 is midnight of the reference date. Timestamps inside a
//! slot floor to its index.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};

/// Minutes covered by one slot
pub const SLOT_MINUTES: i64 = 30;
/// Slots per day (24h at 30-minute granularity)
pub const SLOTS_PER_DAY: i64 = 48;

/// Convert a timestamp to its slot index relative to a reference date.
///
/// Negative indices address slots before the reference date; floor semantics
/// hold on both sides of it.
pub fn to_slot_index(ts: DateTime<Utc>, reference: NaiveDate) -> i64 {
    let days = (ts.date_naive() - reference).num_days();
    let minutes_since_midnight = i64::from(ts.time().num_seconds_from_midnight() / 60);
    days * SLOTS_PER_DAY + minutes_since_midnight / SLOT_MINUTES
}

/// Convert a slot index back to the timestamp of the slot's start.
pub fn to_timestamp(slot_index: i64, reference: NaiveDate) -> DateTime<Utc> {
    let days = slot_index.div_euclid(SLOTS_PER_DAY);
    let slot_in_day = slot_index.rem_euclid(SLOTS_PER_DAY);

    (reference + Duration::days(days)).and_time(chrono::NaiveTime::MIN).and_utc()
        + Duration::minutes(slot_in_day * SLOT_MINUTES)
}

/// Number of whole slots a duration occupies.
///
/// A block of D minutes starting at slot S occupies slots `S .. S + D/30 - 1`.
pub fn duration_slots(duration_minutes: i64) -> i64 {
    duration_minutes / SLOT_MINUTES
}

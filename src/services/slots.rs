use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries;

/// The bookable half-hour slots: a morning block and an afternoon block.
/// Every availability answer is this list annotated against the day's
/// non-cancelled bookings.
pub const SLOT_TIMES: [&str; 17] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "14:00", "14:30", "15:00", "15:30",
    "16:00", "16:30", "17:00", "17:30", "18:00", "18:30", "19:00",
];

#[derive(Debug, Clone, Serialize)]
pub struct Slot {
    pub time: String,
    pub available: bool,
    pub booked: bool,
}

pub fn is_known_slot(time: &str) -> bool {
    SLOT_TIMES.contains(&time)
}

pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// All slots for a date, `available` iff no non-cancelled booking holds
/// the (date, time) pair, `booked` the exact inverse.
pub fn slots_for_date(conn: &Connection, date: &str) -> anyhow::Result<Vec<Slot>> {
    let booked = queries::booked_times_for_date(conn, date)?;

    Ok(SLOT_TIMES
        .iter()
        .map(|time| {
            let taken = booked.iter().any(|t| t == time);
            Slot {
                time: (*time).to_string(),
                available: !taken,
                booked: taken,
            }
        })
        .collect())
}

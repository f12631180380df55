//! Booked-slot database operations.
//!
//! Mutations are crate-private: the reservation coordinator (through the slot
//! index) is the only write path for occupancy.

use rusqlite::params;

use super::{Database, DbResult};
use crate::models::SlotMap;

impl Database {
    /// Is the (doctor, date, time) key currently occupied?
    pub fn slot_occupied(&self, doctor_id: &str, slot_date: &str, slot_time: &str) -> DbResult<bool> {
        let occupied = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM booked_slots
                WHERE doctor_id = ?1 AND slot_date = ?2 AND slot_time = ?3
            )",
            params![doctor_id, slot_date, slot_time],
            |row| row.get(0),
        )?;
        Ok(occupied)
    }

    /// Claim the key. Returns false when it was already taken; the insert and
    /// the presence check are one statement, so two writers cannot both win.
    pub(crate) fn occupy_slot(
        &self,
        doctor_id: &str,
        slot_date: &str,
        slot_time: &str,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "INSERT OR IGNORE INTO booked_slots (doctor_id, slot_date, slot_time)
             VALUES (?1, ?2, ?3)",
            params![doctor_id, slot_date, slot_time],
        )?;
        Ok(rows_affected > 0)
    }

    /// Drop the key. Returns false when it was already absent.
    pub(crate) fn release_slot(
        &self,
        doctor_id: &str,
        slot_date: &str,
        slot_time: &str,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM booked_slots
             WHERE doctor_id = ?1 AND slot_date = ?2 AND slot_time = ?3",
            params![doctor_id, slot_date, slot_time],
        )?;
        Ok(rows_affected > 0)
    }

    /// All occupied keys for a doctor as the nested date -> times map.
    pub fn booked_slots_for(&self, doctor_id: &str) -> DbResult<SlotMap> {
        let mut stmt = self.conn.prepare(
            "SELECT slot_date, slot_time FROM booked_slots WHERE doctor_id = ?",
        )?;

        let rows = stmt.query_map([doctor_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut map = SlotMap::new();
        for row in rows {
            let (date, time) = row?;
            map.entry(date).or_default().insert(time);
        }
        Ok(map)
    }
}

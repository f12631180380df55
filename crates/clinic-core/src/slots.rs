//! Slot index: per-doctor occupancy of (date, time) reservation keys.
//!
//! A slot key is occupied exactly while a live appointment holds it. Only the
//! reservation coordinator calls `occupy`/`release`; everything else reads.

use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::SlotMap;

/// Slot index errors.
#[derive(Error, Debug)]
pub enum SlotError {
    /// The key was taken when occupy ran. Inside the coordinator's exclusion
    /// region this cannot happen; seeing it there is a bug signal, not a user
    /// error.
    #[error("slot already occupied: {doctor_id} {slot_date} {slot_time}")]
    AlreadyOccupied {
        doctor_id: String,
        slot_date: String,
        slot_time: String,
    },

    #[error("storage error: {0}")]
    Storage(#[from] DbError),
}

pub type SlotResult<T> = Result<T, SlotError>;

/// Occupancy view over the booked-slots table.
pub struct SlotIndex<'a> {
    db: &'a Database,
}

impl<'a> SlotIndex<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Is (date, time) taken for this doctor? No side effects.
    pub fn is_occupied(
        &self,
        doctor_id: &str,
        slot_date: &str,
        slot_time: &str,
    ) -> SlotResult<bool> {
        Ok(self.db.slot_occupied(doctor_id, slot_date, slot_time)?)
    }

    /// Mark a key occupied. Called exactly once per successful booking.
    pub fn occupy(&self, doctor_id: &str, slot_date: &str, slot_time: &str) -> SlotResult<()> {
        if self.db.occupy_slot(doctor_id, slot_date, slot_time)? {
            Ok(())
        } else {
            Err(SlotError::AlreadyOccupied {
                doctor_id: doctor_id.to_string(),
                slot_date: slot_date.to_string(),
                slot_time: slot_time.to_string(),
            })
        }
    }

    /// Free a key. Releasing an absent key is a no-op, so a cancellation
    /// retried after a partial failure cannot fail here.
    pub fn release(&self, doctor_id: &str, slot_date: &str, slot_time: &str) -> SlotResult<()> {
        self.db.release_slot(doctor_id, slot_date, slot_time)?;
        Ok(())
    }

    /// Nested date -> time-labels view of a doctor's occupancy.
    pub fn booked_slots(&self, doctor_id: &str) -> SlotResult<SlotMap> {
        Ok(self.db.booked_slots_for(doctor_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Doctor;
    use proptest::prelude::*;

    fn setup() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let doctor = Doctor::new("Dr. Rao".into(), 50);
        db.insert_doctor(&doctor).unwrap();
        (db, doctor.doctor_id)
    }

    #[test]
    fn test_occupy_then_check() {
        let (db, doc) = setup();
        let slots = SlotIndex::new(&db);

        assert!(!slots.is_occupied(&doc, "2024-01-10", "10:00 AM").unwrap());
        slots.occupy(&doc, "2024-01-10", "10:00 AM").unwrap();
        assert!(slots.is_occupied(&doc, "2024-01-10", "10:00 AM").unwrap());
    }

    #[test]
    fn test_double_occupy_fails() {
        let (db, doc) = setup();
        let slots = SlotIndex::new(&db);

        slots.occupy(&doc, "2024-01-10", "10:00 AM").unwrap();
        let err = slots.occupy(&doc, "2024-01-10", "10:00 AM").unwrap_err();
        assert!(matches!(err, SlotError::AlreadyOccupied { .. }));
    }

    #[test]
    fn test_release_is_idempotent() {
        let (db, doc) = setup();
        let slots = SlotIndex::new(&db);

        slots.occupy(&doc, "2024-01-10", "10:00 AM").unwrap();
        slots.release(&doc, "2024-01-10", "10:00 AM").unwrap();
        // Second release of the same key succeeds and changes nothing
        slots.release(&doc, "2024-01-10", "10:00 AM").unwrap();
        assert!(!slots.is_occupied(&doc, "2024-01-10", "10:00 AM").unwrap());

        // And a never-occupied key releases fine too
        slots.release(&doc, "2024-01-11", "09:00 AM").unwrap();
    }

    #[test]
    fn test_keys_are_independent() {
        let (db, doc) = setup();
        let other = Doctor::new("Dr. Verma".into(), 60);
        db.insert_doctor(&other).unwrap();
        let slots = SlotIndex::new(&db);

        slots.occupy(&doc, "2024-01-10", "10:00 AM").unwrap();

        // Same time, other doctor; same doctor, other date/time: all free
        assert!(!slots
            .is_occupied(&other.doctor_id, "2024-01-10", "10:00 AM")
            .unwrap());
        assert!(!slots.is_occupied(&doc, "2024-01-11", "10:00 AM").unwrap());
        assert!(!slots.is_occupied(&doc, "2024-01-10", "11:00 AM").unwrap());
    }

    proptest! {
        // Occupy a set of distinct labels, release everything twice: the
        // doctor's occupancy must come back empty no matter the labels.
        #[test]
        fn prop_release_sequences_drain_the_index(
            times in proptest::collection::btree_set("(0?[1-9]|1[0-2]):[0-5][0-9] (AM|PM)", 1..6)
        ) {
            let (db, doc) = setup();
            let slots = SlotIndex::new(&db);

            for time in &times {
                slots.occupy(&doc, "2024-01-10", time).unwrap();
            }
            for time in &times {
                slots.release(&doc, "2024-01-10", time).unwrap();
                slots.release(&doc, "2024-01-10", time).unwrap();
            }

            prop_assert!(slots.booked_slots(&doc).unwrap().is_empty());
        }
    }
}

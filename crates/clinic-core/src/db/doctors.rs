//! Doctor record database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Doctor;

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        doctor_id: row.get(0)?,
        name: row.get(1)?,
        speciality: row.get(2)?,
        fee: row.get(3)?,
        available: row.get(4)?,
        slots_booked: Default::default(),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl Database {
    /// Insert a new doctor record. `slots_booked` is ignored; occupancy only
    /// enters through the slot index.
    pub fn insert_doctor(&self, doctor: &Doctor) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO doctors (
                doctor_id, name, speciality, fee, available, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                doctor.doctor_id,
                doctor.name,
                doctor.speciality,
                doctor.fee,
                doctor.available,
                doctor.created_at,
                doctor.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a doctor with the slot map materialized.
    pub fn get_doctor(&self, doctor_id: &str) -> DbResult<Option<Doctor>> {
        let doctor = self
            .conn
            .query_row(
                r#"
                SELECT doctor_id, name, speciality, fee, available, created_at, updated_at
                FROM doctors
                WHERE doctor_id = ?
                "#,
                [doctor_id],
                doctor_from_row,
            )
            .optional()?;

        match doctor {
            Some(mut doctor) => {
                doctor.slots_booked = self.booked_slots_for(doctor_id)?;
                Ok(Some(doctor))
            }
            None => Ok(None),
        }
    }

    /// List all doctors, slot maps included.
    pub fn list_doctors(&self) -> DbResult<Vec<Doctor>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT doctor_id, name, speciality, fee, available, created_at, updated_at
            FROM doctors
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map([], doctor_from_row)?;

        let mut doctors = Vec::new();
        for row in rows {
            let mut doctor = row?;
            doctor.slots_booked = self.booked_slots_for(&doctor.doctor_id)?;
            doctors.push(doctor);
        }
        Ok(doctors)
    }

    /// Flip whether the doctor accepts new bookings.
    pub fn set_doctor_availability(&self, doctor_id: &str, available: bool) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE doctors SET available = ?2, updated_at = datetime('now') WHERE doctor_id = ?1",
            params![doctor_id, available],
        )?;
        Ok(rows_affected > 0)
    }

    /// Update the booking fee. Amounts on existing appointments are snapshots
    /// and stay untouched.
    pub fn set_doctor_fee(&self, doctor_id: &str, fee: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE doctors SET fee = ?2, updated_at = datetime('now') WHERE doctor_id = ?1",
            params![doctor_id, fee],
        )?;
        Ok(rows_affected > 0)
    }

    /// Number of doctor records.
    pub fn count_doctors(&self) -> DbResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let mut doctor = Doctor::new("Dr. Rao".into(), 50);
        doctor.speciality = Some("dermatology".into());
        db.insert_doctor(&doctor).unwrap();

        let retrieved = db.get_doctor(&doctor.doctor_id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Dr. Rao");
        assert_eq!(retrieved.fee, 50);
        assert_eq!(retrieved.speciality, Some("dermatology".into()));
        assert!(retrieved.available);
        assert!(retrieved.slots_booked.is_empty());
    }

    #[test]
    fn test_get_missing_doctor() {
        let db = setup_db();
        assert!(db.get_doctor("doc-unknown").unwrap().is_none());
    }

    #[test]
    fn test_set_availability() {
        let db = setup_db();

        let doctor = Doctor::new("Dr. Rao".into(), 50);
        db.insert_doctor(&doctor).unwrap();

        assert!(db.set_doctor_availability(&doctor.doctor_id, false).unwrap());
        let retrieved = db.get_doctor(&doctor.doctor_id).unwrap().unwrap();
        assert!(!retrieved.available);

        // Unknown doctor reports no update
        assert!(!db.set_doctor_availability("doc-unknown", true).unwrap());
    }

    #[test]
    fn test_set_fee() {
        let db = setup_db();

        let doctor = Doctor::new("Dr. Rao".into(), 50);
        db.insert_doctor(&doctor).unwrap();

        assert!(db.set_doctor_fee(&doctor.doctor_id, 75).unwrap());
        let retrieved = db.get_doctor(&doctor.doctor_id).unwrap().unwrap();
        assert_eq!(retrieved.fee, 75);
    }

    #[test]
    fn test_list_doctors_sorted_by_name() {
        let db = setup_db();

        db.insert_doctor(&Doctor::new("Dr. Verma".into(), 60)).unwrap();
        db.insert_doctor(&Doctor::new("Dr. Anand".into(), 40)).unwrap();

        let doctors = db.list_doctors().unwrap();
        assert_eq!(doctors.len(), 2);
        assert_eq!(doctors[0].name, "Dr. Anand");
        assert_eq!(doctors[1].name, "Dr. Verma");
        assert_eq!(db.count_doctors().unwrap(), 2);
    }
}

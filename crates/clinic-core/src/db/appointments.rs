//! Appointment ledger database operations.
//!
//! The ledger is append-mostly: inserts plus single-flag updates. Nothing
//! here deletes a row.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Appointment;

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        appointment_id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        slot_date: row.get(3)?,
        slot_time: row.get(4)?,
        amount: row.get(5)?,
        cancelled: row.get(6)?,
        is_completed: row.get(7)?,
        payment: row.get(8)?,
        created_at: row.get(9)?,
    })
}

const APPOINTMENT_COLUMNS: &str = "appointment_id, patient_id, doctor_id, slot_date, slot_time,
       amount, cancelled, is_completed, payment, created_at";

impl Database {
    /// Append a new appointment to the ledger.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO appointments (
                appointment_id, patient_id, doctor_id, slot_date, slot_time,
                amount, cancelled, is_completed, payment, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                appointment.appointment_id,
                appointment.patient_id,
                appointment.doctor_id,
                appointment.slot_date,
                appointment.slot_time,
                appointment.amount,
                appointment.cancelled,
                appointment.is_completed,
                appointment.payment,
                appointment.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get an appointment by id.
    pub fn get_appointment(&self, appointment_id: &str) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE appointment_id = ?"
                ),
                [appointment_id],
                appointment_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Set the cancelled flag. Counts the row even when the flag was already
    /// set, so retries report success.
    pub(crate) fn mark_cancelled(&self, appointment_id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE appointments SET cancelled = 1 WHERE appointment_id = ?",
            [appointment_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Set the completed flag.
    pub(crate) fn mark_completed(&self, appointment_id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE appointments SET is_completed = 1 WHERE appointment_id = ?",
            [appointment_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Set the payment flag.
    pub(crate) fn mark_paid(&self, appointment_id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE appointments SET payment = 1 WHERE appointment_id = ?",
            [appointment_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// A patient's appointments, newest first.
    pub fn appointments_for_patient(&self, patient_id: &str) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE patient_id = ?
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map([patient_id], appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// A doctor's appointments, newest first.
    pub fn appointments_for_doctor(&self, doctor_id: &str) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE doctor_id = ?
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map([doctor_id], appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Every appointment in the ledger, newest first (admin view).
    pub fn list_appointments(&self) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map([], appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// The most recently created appointments, newest first.
    pub fn latest_appointments(&self, limit: usize) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?"
        ))?;
        let rows = stmt.query_map([limit as i64], appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// The most recently created appointments for one doctor, newest first.
    pub fn latest_appointments_for_doctor(
        &self,
        doctor_id: &str,
        limit: usize,
    ) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE doctor_id = ?
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?"
        ))?;
        let rows = stmt.query_map(params![doctor_id, limit as i64], appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Ledger size.
    pub fn count_appointments(&self) -> DbResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Distinct patients seen across the whole ledger.
    pub fn count_distinct_patients(&self) -> DbResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(DISTINCT patient_id) FROM appointments",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Distinct patients seen by one doctor.
    pub fn count_distinct_patients_for_doctor(&self, doctor_id: &str) -> DbResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(DISTINCT patient_id) FROM appointments WHERE doctor_id = ?",
            [doctor_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Appointment count for one doctor.
    pub fn count_appointments_for_doctor(&self, doctor_id: &str) -> DbResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM appointments WHERE doctor_id = ?",
            [doctor_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Earnings rule from the doctor panel: an appointment counts once it is
    /// completed or paid for.
    pub fn doctor_earnings(&self, doctor_id: &str) -> DbResult<i64> {
        let sum = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM appointments
             WHERE doctor_id = ? AND (is_completed = 1 OR payment = 1)",
            [doctor_id],
            |row| row.get(0),
        )?;
        Ok(sum)
    }
}

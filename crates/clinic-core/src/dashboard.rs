//! Read-only summary scans over the ledger and doctor records.
//!
//! Each summary is a handful of individually consistent queries; a brief
//! staleness window between them is acceptable.

use serde::Serialize;

use crate::db::{Database, DbResult};
use crate::models::Appointment;

/// Number of recent appointments surfaced on dashboards.
pub const LATEST_LIMIT: usize = 5;

/// Platform-wide numbers for the admin panel.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdminSummary {
    pub doctors: i64,
    pub appointments: i64,
    /// Distinct patients appearing in the ledger
    pub patients: i64,
    /// Most recently created appointments, newest first
    pub latest: Vec<Appointment>,
}

/// Per-doctor numbers for the doctor panel.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DoctorSummary {
    /// Sum of amounts over completed or paid appointments
    pub earnings: i64,
    pub appointments: i64,
    pub patients: i64,
    pub latest: Vec<Appointment>,
}

/// Aggregator over the ledger. Never writes.
pub struct Dashboard<'a> {
    db: &'a Database,
}

impl<'a> Dashboard<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn admin_summary(&self) -> DbResult<AdminSummary> {
        Ok(AdminSummary {
            doctors: self.db.count_doctors()?,
            appointments: self.db.count_appointments()?,
            patients: self.db.count_distinct_patients()?,
            latest: self.db.latest_appointments(LATEST_LIMIT)?,
        })
    }

    pub fn doctor_summary(&self, doctor_id: &str) -> DbResult<DoctorSummary> {
        Ok(DoctorSummary {
            earnings: self.db.doctor_earnings(doctor_id)?,
            appointments: self.db.count_appointments_for_doctor(doctor_id)?,
            patients: self.db.count_distinct_patients_for_doctor(doctor_id)?,
            latest: self.db.latest_appointments_for_doctor(doctor_id, LATEST_LIMIT)?,
        })
    }
}

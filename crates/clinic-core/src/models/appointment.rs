//! Appointment ledger records.

use serde::{Deserialize, Serialize};

/// A single appointment. Records are soft-state: lifecycle flags move, rows
/// are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Opaque unique id
    pub appointment_id: String,
    /// Booking patient (reference key only)
    pub patient_id: String,
    /// Booked doctor
    pub doctor_id: String,
    /// Reserved calendar date, immutable after creation
    pub slot_date: String,
    /// Reserved time label, immutable after creation
    pub slot_time: String,
    /// Doctor's fee snapshotted at booking time; later fee changes never touch it
    pub amount: i64,
    /// Monotonic: once true it never reverts through normal flow
    pub cancelled: bool,
    /// Mutually exclusive with `cancelled` in steady state
    pub is_completed: bool,
    /// Set only by the payment confirmation gate
    pub payment: bool,
    /// Creation timestamp, set once
    pub created_at: String,
}

impl Appointment {
    /// Create a freshly booked appointment.
    pub fn new(
        patient_id: String,
        doctor_id: String,
        slot_date: String,
        slot_time: String,
        amount: i64,
    ) -> Self {
        Self {
            appointment_id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            doctor_id,
            slot_date,
            slot_time,
            amount,
            cancelled: false,
            is_completed: false,
            payment: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// A live appointment is the one holding its slot key.
    pub fn is_live(&self) -> bool {
        !self.cancelled
    }
}

//! Reservation coordinator: the only path that creates appointments or frees
//! slots.
//!
//! Booking and cancellation for one doctor are serialized by a per-doctor
//! lock, so the check-and-mutate region of one call never interleaves with
//! another call on the same doctor. The slot index and the ledger live in the
//! same store but are written as two steps; when the second step fails the
//! first is compensated, never left dangling.

mod locks;

pub use locks::SlotLocks;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{error, info};

use crate::db::{Database, DbError};
use crate::models::{Actor, Appointment, BookAppointmentRequest, Role, ValidationError};
use crate::slots::{SlotError, SlotIndex};

/// Reservation errors.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("doctor is not accepting bookings: {0}")]
    DoctorUnavailable(String),

    #[error("slot not available")]
    SlotUnavailable,

    #[error("not authorized for this appointment")]
    Unauthorized,

    #[error("appointment is already {0}")]
    InvalidState(&'static str),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("slot index error: {0}")]
    Slot(#[from] SlotError),

    #[error("storage error: {0}")]
    Storage(#[from] DbError),
}

pub type BookingResult<T> = Result<T, BookingError>;

/// Coordinates slot occupancy and the appointment ledger.
pub struct ReservationCoordinator {
    db: Arc<Mutex<Database>>,
    locks: Arc<SlotLocks>,
}

impl ReservationCoordinator {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self {
            db,
            locks: Arc::new(SlotLocks::new()),
        }
    }

    fn db(&self) -> Result<MutexGuard<'_, Database>, DbError> {
        self.db.lock().map_err(|_| DbError::LockPoisoned)
    }

    /// Book a slot for the authenticated patient.
    pub fn book(&self, actor: &Actor, request: &BookAppointmentRequest) -> BookingResult<Appointment> {
        if actor.role != Role::Patient {
            return Err(BookingError::Unauthorized);
        }
        request.validate()?;

        let lock = self.locks.doctor(&request.doctor_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let doctor = self
            .db()?
            .get_doctor(&request.doctor_id)?
            .ok_or_else(|| BookingError::NotFound(request.doctor_id.clone()))?;
        if !doctor.available {
            return Err(BookingError::DoctorUnavailable(request.doctor_id.clone()));
        }

        {
            let db = self.db()?;
            let slots = SlotIndex::new(&db);
            if slots.is_occupied(&request.doctor_id, &request.slot_date, &request.slot_time)? {
                return Err(BookingError::SlotUnavailable);
            }
        }

        // Amount is a snapshot of the fee right now; later fee edits must not
        // reprice this appointment.
        let appointment = Appointment::new(
            actor.id.clone(),
            request.doctor_id.clone(),
            request.slot_date.clone(),
            request.slot_time.clone(),
            doctor.fee,
        );
        self.execute_booking(appointment)
    }

    /// Occupy-then-append as one logical transaction: when the ledger insert
    /// fails after the slot was taken, the occupy is compensated by a release
    /// before the error surfaces. No slot may stay occupied without a live
    /// appointment.
    fn execute_booking(&self, appointment: Appointment) -> BookingResult<Appointment> {
        {
            let db = self.db()?;
            let slots = SlotIndex::new(&db);
            match slots.occupy(
                &appointment.doctor_id,
                &appointment.slot_date,
                &appointment.slot_time,
            ) {
                Ok(()) => {}
                Err(SlotError::AlreadyOccupied { .. }) => {
                    // Unreachable while the per-doctor lock holds; reaching it
                    // means the exclusion region is broken.
                    error!(
                        doctor_id = %appointment.doctor_id,
                        slot_date = %appointment.slot_date,
                        slot_time = %appointment.slot_time,
                        "occupy lost a race inside the exclusion region"
                    );
                    return Err(BookingError::SlotUnavailable);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let inserted = self.db()?.insert_appointment(&appointment);
        if let Err(e) = inserted {
            if e.is_constraint_violation() {
                error!(
                    doctor_id = %appointment.doctor_id,
                    slot_date = %appointment.slot_date,
                    slot_time = %appointment.slot_time,
                    "ledger rejected a booking the slot index admitted"
                );
            }
            match self.db() {
                Ok(db) => {
                    if let Err(rollback) = SlotIndex::new(&db).release(
                        &appointment.doctor_id,
                        &appointment.slot_date,
                        &appointment.slot_time,
                    ) {
                        error!(error = %rollback, "slot release failed while rolling back a booking");
                    }
                }
                Err(lock_err) => {
                    error!(error = %lock_err, "could not reach storage to roll back a booking");
                }
            }
            return Err(e.into());
        }

        info!(
            appointment_id = %appointment.appointment_id,
            doctor_id = %appointment.doctor_id,
            slot_date = %appointment.slot_date,
            slot_time = %appointment.slot_time,
            "appointment booked"
        );
        Ok(appointment)
    }

    /// Cancel an appointment and free its slot.
    pub fn cancel(&self, appointment_id: &str, actor: &Actor) -> BookingResult<()> {
        let appointment = self
            .db()?
            .get_appointment(appointment_id)?
            .ok_or_else(|| BookingError::NotFound(appointment_id.to_string()))?;

        let authorized = match actor.role {
            Role::Admin => true,
            Role::Patient => actor.id == appointment.patient_id,
            Role::Doctor => actor.id == appointment.doctor_id,
        };
        if !authorized {
            return Err(BookingError::Unauthorized);
        }

        let lock = self.locks.doctor(&appointment.doctor_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Re-read under the lock; a concurrent cancel or complete may have won.
        let appointment = self
            .db()?
            .get_appointment(appointment_id)?
            .ok_or_else(|| BookingError::NotFound(appointment_id.to_string()))?;
        if appointment.cancelled {
            // Idempotent: no duplicate side effects on retry.
            return Ok(());
        }
        if appointment.is_completed {
            return Err(BookingError::InvalidState("completed"));
        }

        // Flag first, slot second. A crash between the two leaves a cancelled
        // appointment with a stale slot; the retry lands in the idempotent
        // branch above and release itself is idempotent.
        self.db()?.mark_cancelled(appointment_id)?;
        {
            let db = self.db()?;
            SlotIndex::new(&db).release(
                &appointment.doctor_id,
                &appointment.slot_date,
                &appointment.slot_time,
            )?;
        }

        info!(
            appointment_id = %appointment_id,
            doctor_id = %appointment.doctor_id,
            "appointment cancelled"
        );
        Ok(())
    }

    /// Mark an appointment completed. Doctor-only; the slot index is not
    /// touched, a consumed slot stays occupied.
    pub fn complete(&self, appointment_id: &str, doctor_id: &str) -> BookingResult<()> {
        let appointment = self
            .db()?
            .get_appointment(appointment_id)?
            .ok_or_else(|| BookingError::NotFound(appointment_id.to_string()))?;
        if appointment.doctor_id != doctor_id {
            return Err(BookingError::Unauthorized);
        }

        let lock = self.locks.doctor(doctor_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let appointment = self
            .db()?
            .get_appointment(appointment_id)?
            .ok_or_else(|| BookingError::NotFound(appointment_id.to_string()))?;
        if appointment.cancelled {
            // Never silently un-cancel.
            return Err(BookingError::InvalidState("cancelled"));
        }
        if appointment.is_completed {
            return Ok(());
        }

        self.db()?.mark_completed(appointment_id)?;
        info!(appointment_id = %appointment_id, doctor_id = %doctor_id, "appointment completed");
        Ok(())
    }
}

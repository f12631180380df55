//! Clinic Core Library
//!
//! Appointment slot reservation and lifecycle engine for the clinic platform.
//!
//! # Architecture
//!
//! ```text
//! Book / Cancel ──► Reservation Coordinator ──► Slot Index (occupy/release)
//!                        │      per-doctor            │
//!                        │      exclusion             │
//!                        ▼                            ▼
//!                 Appointment Ledger ◄──────── SQLite store
//!                        ▲
//!                        │ payment flag only
//! CreateOrder / Confirm ─┴── Payment Gate ──► external provider
//!
//! Dashboards ──► Dashboard Aggregator (read-only scans)
//! ```
//!
//! # Core Principle
//!
//! **At most one live appointment per (doctor, date, time) key.** Bookings and
//! cancellations for one doctor are serialized; a slot is never left occupied
//! without a live appointment, and never freed while one exists.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer (doctors, booked slots, appointment ledger)
//! - [`models`]: Domain types (Doctor, Appointment, Actor, request payloads)
//! - [`slots`]: Slot index with atomic occupy/release
//! - [`booking`]: Reservation coordinator and per-doctor locking
//! - [`payments`]: Payment confirmation gate over an external provider
//! - [`dashboard`]: Read-only summary aggregation

pub mod booking;
pub mod dashboard;
pub mod db;
pub mod models;
pub mod payments;
pub mod slots;

// Re-export commonly used types
pub use booking::{BookingError, ReservationCoordinator, SlotLocks};
pub use dashboard::{AdminSummary, Dashboard, DoctorSummary};
pub use db::Database;
pub use models::{Actor, Appointment, BookAppointmentRequest, Doctor, OrderHandle, Role};
pub use payments::{PaymentError, PaymentGate};
pub use slots::{SlotError, SlotIndex};

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use clinic_payments::PaymentProvider;

use db::{DbError, DbResult};

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe engine facade.
///
/// Shares one store between the coordinator, the payment gate, and the
/// read paths; clone-free callers just take `&self` from any thread.
pub struct ClinicCore {
    db: Arc<Mutex<Database>>,
    coordinator: ReservationCoordinator,
    gate: PaymentGate,
}

impl ClinicCore {
    /// Open or create the engine's store at the given path.
    pub fn open<P: AsRef<Path>>(path: P, provider: Arc<dyn PaymentProvider>) -> DbResult<Self> {
        Self::with_database(Database::open(path)?, provider)
    }

    /// Engine over an in-memory store (for testing).
    pub fn open_in_memory(provider: Arc<dyn PaymentProvider>) -> DbResult<Self> {
        Self::with_database(Database::open_in_memory()?, provider)
    }

    fn with_database(db: Database, provider: Arc<dyn PaymentProvider>) -> DbResult<Self> {
        let db = Arc::new(Mutex::new(db));
        Ok(Self {
            coordinator: ReservationCoordinator::new(db.clone()),
            gate: PaymentGate::new(db.clone(), provider),
            db,
        })
    }

    fn db(&self) -> Result<MutexGuard<'_, Database>, DbError> {
        self.db.lock().map_err(|_| DbError::LockPoisoned)
    }

    // =========================================================================
    // Doctor Record Operations
    // =========================================================================

    /// Register a doctor record (onboarding flows call this once).
    pub fn add_doctor(&self, doctor: &Doctor) -> DbResult<()> {
        self.db()?.insert_doctor(doctor)
    }

    /// Get a doctor with the slot map materialized.
    pub fn get_doctor(&self, doctor_id: &str) -> DbResult<Option<Doctor>> {
        self.db()?.get_doctor(doctor_id)
    }

    /// All doctors, for the booking page and admin panel.
    pub fn list_doctors(&self) -> DbResult<Vec<Doctor>> {
        self.db()?.list_doctors()
    }

    /// Flip whether a doctor accepts new bookings.
    pub fn set_doctor_availability(&self, doctor_id: &str, available: bool) -> DbResult<bool> {
        self.db()?.set_doctor_availability(doctor_id, available)
    }

    /// Update a doctor's fee. Existing appointment amounts are snapshots and
    /// stay as booked.
    pub fn set_doctor_fee(&self, doctor_id: &str, fee: i64) -> DbResult<bool> {
        self.db()?.set_doctor_fee(doctor_id, fee)
    }

    // =========================================================================
    // Reservation Operations
    // =========================================================================

    /// Book a slot for the authenticated patient.
    pub fn book(
        &self,
        actor: &Actor,
        request: &BookAppointmentRequest,
    ) -> Result<Appointment, BookingError> {
        self.coordinator.book(actor, request)
    }

    /// Cancel an appointment (owning patient, owning doctor, or admin).
    pub fn cancel(&self, appointment_id: &str, actor: &Actor) -> Result<(), BookingError> {
        self.coordinator.cancel(appointment_id, actor)
    }

    /// Mark an appointment completed (owning doctor only).
    pub fn complete(&self, appointment_id: &str, doctor_id: &str) -> Result<(), BookingError> {
        self.coordinator.complete(appointment_id, doctor_id)
    }

    // =========================================================================
    // Ledger Reads
    // =========================================================================

    /// Get an appointment by id.
    pub fn get_appointment(&self, appointment_id: &str) -> DbResult<Option<Appointment>> {
        self.db()?.get_appointment(appointment_id)
    }

    /// A patient's appointment history, newest first.
    pub fn appointments_for_patient(&self, patient_id: &str) -> DbResult<Vec<Appointment>> {
        self.db()?.appointments_for_patient(patient_id)
    }

    /// A doctor's appointment list, newest first.
    pub fn appointments_for_doctor(&self, doctor_id: &str) -> DbResult<Vec<Appointment>> {
        self.db()?.appointments_for_doctor(doctor_id)
    }

    /// Every appointment, newest first (admin view).
    pub fn list_appointments(&self) -> DbResult<Vec<Appointment>> {
        self.db()?.list_appointments()
    }

    // =========================================================================
    // Payment Operations
    // =========================================================================

    /// Open a provider order for an appointment's amount.
    pub fn create_order(&self, appointment_id: &str) -> Result<OrderHandle, PaymentError> {
        self.gate.create_order(appointment_id)
    }

    /// Reconcile a provider order; flips the payment flag when settled.
    pub fn confirm_payment(&self, provider_order_id: &str) -> Result<(), PaymentError> {
        self.gate.confirm(provider_order_id)
    }

    // =========================================================================
    // Dashboards
    // =========================================================================

    /// Platform-wide summary for the admin panel.
    pub fn admin_dashboard(&self) -> DbResult<AdminSummary> {
        let db = self.db()?;
        Dashboard::new(&db).admin_summary()
    }

    /// Per-doctor summary for the doctor panel.
    pub fn doctor_dashboard(&self, doctor_id: &str) -> DbResult<DoctorSummary> {
        let db = self.db()?;
        Dashboard::new(&db).doctor_summary(doctor_id)
    }
}

//! Payment confirmation gate: reconciles provider orders with the ledger.
//!
//! The gate owns exactly one ledger field, the payment flag. Orders are
//! created against the provider with the appointment id as receipt; on
//! confirmation the receipt leads back to the appointment to mark.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tracing::info;

use clinic_payments::{PaymentProvider, ProviderError};

use crate::db::{Database, DbError};
use crate::models::OrderHandle;

/// Minor currency units per major unit (rupees to paise).
pub const MINOR_UNITS_PER_UNIT: i64 = 100;

const DEFAULT_CURRENCY: &str = "INR";

/// Payment gate errors.
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("appointment already cancelled: {0}")]
    AlreadyCancelled(String),

    #[error("payment not completed")]
    PaymentNotCompleted,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("storage error: {0}")]
    Storage(#[from] DbError),
}

pub type PaymentResult<T> = Result<T, PaymentError>;

/// Reconciles an external payment provider with the appointment ledger.
pub struct PaymentGate {
    db: Arc<Mutex<Database>>,
    provider: Arc<dyn PaymentProvider>,
    currency: String,
}

impl PaymentGate {
    pub fn new(db: Arc<Mutex<Database>>, provider: Arc<dyn PaymentProvider>) -> Self {
        Self {
            db,
            provider,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    fn db(&self) -> Result<MutexGuard<'_, Database>, DbError> {
        self.db.lock().map_err(|_| DbError::LockPoisoned)
    }

    /// Open a provider order covering the appointment's amount. No local
    /// state changes; the ledger only moves on [`PaymentGate::confirm`].
    pub fn create_order(&self, appointment_id: &str) -> PaymentResult<OrderHandle> {
        let appointment = self
            .db()?
            .get_appointment(appointment_id)?
            .ok_or_else(|| PaymentError::NotFound(appointment_id.to_string()))?;
        if appointment.cancelled {
            return Err(PaymentError::AlreadyCancelled(appointment_id.to_string()));
        }

        let order = self.provider.create_order(
            appointment.amount * MINOR_UNITS_PER_UNIT,
            &self.currency,
            &appointment.appointment_id,
        )?;

        info!(
            appointment_id = %appointment_id,
            provider_order_id = %order.provider_order_id,
            "payment order created"
        );
        Ok(OrderHandle::from(order))
    }

    /// If the provider reports the order settled, flip the appointment's
    /// payment flag. Confirming twice is a no-op. A cancelled appointment
    /// still gets its payment recorded; refund handling lives upstream.
    pub fn confirm(&self, provider_order_id: &str) -> PaymentResult<()> {
        let order = self.provider.fetch_order(provider_order_id)?;
        if !order.status.is_paid() {
            return Err(PaymentError::PaymentNotCompleted);
        }

        let updated = self.db()?.mark_paid(&order.receipt)?;
        if !updated {
            return Err(PaymentError::NotFound(order.receipt));
        }

        info!(
            appointment_id = %order.receipt,
            provider_order_id = %provider_order_id,
            "payment confirmed"
        );
        Ok(())
    }
}

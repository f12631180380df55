//! Request and response value types for the engine's operations.
//!
//! Payloads are validated here, at the boundary, before they reach the
//! reservation path.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use clinic_payments::ProviderOrder;

/// A payload field rejected at the boundary.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

/// Booking input. The patient identity comes from the authenticated actor,
/// never from the payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookAppointmentRequest {
    pub doctor_id: String,
    /// Calendar date, `YYYY-MM-DD`
    pub slot_date: String,
    /// Time label, e.g. `10:00 AM`
    pub slot_time: String,
}

impl BookAppointmentRequest {
    pub fn new(
        doctor_id: impl Into<String>,
        slot_date: impl Into<String>,
        slot_time: impl Into<String>,
    ) -> Self {
        Self {
            doctor_id: doctor_id.into(),
            slot_date: slot_date.into(),
            slot_time: slot_time.into(),
        }
    }

    /// Shape validation only; whether the slot is free is the coordinator's
    /// call.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.doctor_id.trim().is_empty() {
            return Err(ValidationError {
                field: "doctor_id",
                reason: "must not be empty".into(),
            });
        }
        if chrono::NaiveDate::parse_from_str(&self.slot_date, "%Y-%m-%d").is_err() {
            return Err(ValidationError {
                field: "slot_date",
                reason: format!("{:?} is not a YYYY-MM-DD date", self.slot_date),
            });
        }
        if chrono::NaiveTime::parse_from_str(&self.slot_time, "%I:%M %p").is_err() {
            return Err(ValidationError {
                field: "slot_time",
                reason: format!("{:?} is not a clock label like \"10:00 AM\"", self.slot_time),
            });
        }
        Ok(())
    }
}

/// Provider order handle handed back to the caller for checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderHandle {
    /// Provider-issued order id; feed it back into payment confirmation
    pub provider_order_id: String,
    /// Amount in minor currency units, as the provider expects it
    pub amount_minor: i64,
    pub currency: String,
    /// The appointment id the order was opened for
    pub receipt: String,
}

impl From<ProviderOrder> for OrderHandle {
    fn from(order: ProviderOrder) -> Self {
        Self {
            provider_order_id: order.provider_order_id,
            amount_minor: order.amount_minor,
            currency: order.currency,
            receipt: order.receipt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let req = BookAppointmentRequest::new("doc-1", "2024-01-10", "10:00 AM");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_unpadded_hour_accepted() {
        let req = BookAppointmentRequest::new("doc-1", "2024-01-10", "9:30 PM");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_doctor() {
        let req = BookAppointmentRequest::new("  ", "2024-01-10", "10:00 AM");
        let err = req.validate().unwrap_err();
        assert_eq!(err.field, "doctor_id");
    }

    #[test]
    fn test_rejects_bad_date() {
        for date in ["10-01-2024", "2024/01/10", "2024-13-40", "today"] {
            let req = BookAppointmentRequest::new("doc-1", date, "10:00 AM");
            let err = req.validate().unwrap_err();
            assert_eq!(err.field, "slot_date", "date {:?} should be rejected", date);
        }
    }

    #[test]
    fn test_rejects_bad_time() {
        for time in ["25:00 AM", "10:00", "ten o'clock", "10:00 XM"] {
            let req = BookAppointmentRequest::new("doc-1", "2024-01-10", time);
            let err = req.validate().unwrap_err();
            assert_eq!(err.field, "slot_time", "time {:?} should be rejected", time);
        }
    }
}

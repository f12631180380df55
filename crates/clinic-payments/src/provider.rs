//! Payment provider contract and order types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settlement status of a provider order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order created, no payment attempt yet
    Created,
    /// Payment attempted but not settled
    Pending,
    /// Payment settled
    Paid,
    /// Payment failed
    Failed,
}

impl OrderStatus {
    /// Only `Paid` allows the appointment's payment flag to flip.
    pub fn is_paid(&self) -> bool {
        matches!(self, OrderStatus::Paid)
    }
}

/// An order as reported by the payment provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderOrder {
    /// Provider-issued order id
    pub provider_order_id: String,
    /// Amount in minor currency units (e.g. paise)
    pub amount_minor: i64,
    /// ISO currency code
    pub currency: String,
    /// Caller-supplied receipt reference (the appointment id)
    pub receipt: String,
    /// Current settlement status
    pub status: OrderStatus,
}

/// Provider errors.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Provider I/O failure; safe for the caller to retry.
    #[error("payment provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider order not found: {0}")]
    OrderNotFound(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// External payment provider boundary.
///
/// Implementations are shared across request-handling threads.
pub trait PaymentProvider: Send + Sync {
    /// Create an order for `amount_minor`, tagged with a caller receipt reference.
    fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> ProviderResult<ProviderOrder>;

    /// Fetch the current state of a previously created order.
    fn fetch_order(&self, provider_order_id: &str) -> ProviderResult<ProviderOrder>;
}

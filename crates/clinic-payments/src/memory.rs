//! In-memory payment provider for tests and local development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::provider::{OrderStatus, PaymentProvider, ProviderError, ProviderOrder, ProviderResult};

/// In-memory provider. Orders start as [`OrderStatus::Created`] and only move
/// through the settlement hooks below, standing in for the real provider's
/// checkout flow.
#[derive(Default)]
pub struct MemoryProvider {
    orders: Mutex<HashMap<String, ProviderOrder>>,
    next_id: AtomicU64,
    offline: AtomicBool,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a provider outage: while offline every call returns
    /// [`ProviderError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Settle an order. Returns false if the order does not exist.
    pub fn mark_paid(&self, provider_order_id: &str) -> bool {
        self.set_status(provider_order_id, OrderStatus::Paid)
    }

    /// Force an order into an arbitrary status.
    pub fn set_status(&self, provider_order_id: &str, status: OrderStatus) -> bool {
        let mut orders = self.lock_orders();
        match orders.get_mut(provider_order_id) {
            Some(order) => {
                order.status = status;
                true
            }
            None => false,
        }
    }

    fn lock_orders(&self) -> std::sync::MutexGuard<'_, HashMap<String, ProviderOrder>> {
        // The map holds no invariants across entries; a poisoned guard is usable.
        self.orders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_online(&self) -> ProviderResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable("provider offline".into()));
        }
        Ok(())
    }
}

impl PaymentProvider for MemoryProvider {
    fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> ProviderResult<ProviderOrder> {
        self.check_online()?;

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let order = ProviderOrder {
            provider_order_id: format!("order_{n:06}"),
            amount_minor,
            currency: currency.to_string(),
            receipt: receipt.to_string(),
            status: OrderStatus::Created,
        };

        self.lock_orders()
            .insert(order.provider_order_id.clone(), order.clone());
        Ok(order)
    }

    fn fetch_order(&self, provider_order_id: &str) -> ProviderResult<ProviderOrder> {
        self.check_online()?;

        self.lock_orders()
            .get(provider_order_id)
            .cloned()
            .ok_or_else(|| ProviderError::OrderNotFound(provider_order_id.to_string()))
    }
}

//! Razorpay orders API client.
//!
//! Thin blocking client over the two endpoints the platform uses:
//! `POST /orders` and `GET /orders/{id}`. Authentication is HTTP basic with
//! the key id/secret pair from the Razorpay dashboard.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::provider::{OrderStatus, PaymentProvider, ProviderError, ProviderOrder, ProviderResult};

const DEFAULT_BASE_URL: &str = "https://api.razorpay.com/v1";

/// Razorpay API configuration.
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub base_url: String,
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different host (sandbox, test double).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

pub struct RazorpayClient {
    config: RazorpayConfig,
    http: Client,
}

/// Order document as returned by the orders API.
#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
    receipt: Option<String>,
    status: String,
}

impl RazorpayClient {
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn to_order(&self, resp: OrderResponse) -> ProviderOrder {
        ProviderOrder {
            provider_order_id: resp.id,
            amount_minor: resp.amount,
            currency: resp.currency,
            receipt: resp.receipt.unwrap_or_default(),
            status: map_status(&resp.status),
        }
    }
}

/// Razorpay reports `created`, `attempted`, `paid`.
fn map_status(raw: &str) -> OrderStatus {
    match raw {
        "created" => OrderStatus::Created,
        "attempted" => OrderStatus::Pending,
        "paid" => OrderStatus::Paid,
        _ => OrderStatus::Failed,
    }
}

impl PaymentProvider for RazorpayClient {
    fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> ProviderResult<ProviderOrder> {
        let body = json!({
            "amount": amount_minor,
            "currency": currency,
            "receipt": receipt,
        });

        let resp = self
            .http
            .post(format!("{}/orders", self.config.base_url))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&body)
            .send()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let order: OrderResponse = resp
            .json()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        Ok(self.to_order(order))
    }

    fn fetch_order(&self, provider_order_id: &str) -> ProviderResult<ProviderOrder> {
        let resp = self
            .http
            .get(format!("{}/orders/{}", self.config.base_url, provider_order_id))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .send()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::OrderNotFound(provider_order_id.to_string()));
        }

        let resp = resp
            .error_for_status()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        let order: OrderResponse = resp
            .json()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        Ok(self.to_order(order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(map_status("created"), OrderStatus::Created);
        assert_eq!(map_status("attempted"), OrderStatus::Pending);
        assert_eq!(map_status("paid"), OrderStatus::Paid);
        assert_eq!(map_status("refunded"), OrderStatus::Failed);
    }

    #[test]
    fn test_order_response_parsing() {
        let raw = r#"{
            "id": "order_ABC123",
            "amount": 5000,
            "currency": "INR",
            "receipt": "appt-1",
            "status": "paid",
            "entity": "order"
        }"#;

        let resp: OrderResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.id, "order_ABC123");
        assert_eq!(resp.amount, 5000);
        assert_eq!(resp.receipt.as_deref(), Some("appt-1"));
        assert_eq!(map_status(&resp.status), OrderStatus::Paid);
    }
}

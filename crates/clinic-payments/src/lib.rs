//! Payment provider boundary for the clinic platform.
//!
//! The core engine only ever talks to a [`PaymentProvider`]: it creates an
//! order for an appointment's fee and later asks for that order's settlement
//! status. The provider's own ledger, refunds, and webhooks live on the
//! provider's side of the boundary.
//!
//! [`MemoryProvider`] backs tests and local development; the `razorpay`
//! feature adds an HTTP client for the Razorpay orders API.

pub mod memory;
pub mod provider;
#[cfg(feature = "razorpay")]
pub mod razorpay;

pub use memory::MemoryProvider;
pub use provider::{OrderStatus, PaymentProvider, ProviderError, ProviderOrder, ProviderResult};
#[cfg(feature = "razorpay")]
pub use razorpay::{RazorpayClient, RazorpayConfig};

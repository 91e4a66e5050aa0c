//! Payment gateway seam.
//!
//! The booking flow charges through [`PaymentGateway::authorize_and_capture`]
//! (amount taken from the request, confirmed immediately). The standalone
//! pre-authorization endpoint uses [`PaymentGateway::preauthorize`], which
//! creates an unconfirmed intent for a fixed configured amount.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod stripe;

pub use stripe::StripeGateway;

/// The only currency the service charges in.
pub const CURRENCY: &str = "usd";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Succeeded,
    Processing,
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    RequiresCapture,
    Canceled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    /// Amount in minor currency units (cents).
    pub amount_minor: i64,
    pub currency: String,
    pub payment_method_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: PaymentStatus,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub client_secret: Option<String>,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway refused the charge (card declined, invalid payment method).
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected gateway response ({status}): {message}")]
    Unexpected { status: u16, message: String },

    #[error("gateway is not configured: {0}")]
    NotConfigured(&'static str),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create and confirm a charge in one call. The returned intent carries
    /// the terminal status reported by the gateway.
    async fn authorize_and_capture(
        &self,
        charge: &ChargeRequest,
    ) -> Result<PaymentIntent, GatewayError>;

    /// Create an unconfirmed intent the client can complete on its own.
    async fn preauthorize(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, GatewayError>;
}

/// Convert a major-unit price to minor units, rounding half away from zero.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

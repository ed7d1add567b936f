//! Payment gateway integration.
//!
//! Card orders create a payment intent with Stripe at checkout; the client
//! completes the payment and then calls back to confirm it. The gateway
//! sits behind the [`PaymentGateway`] trait so the rest of the application
//! never cares which backend is active:
//!
//! - [`StripeGateway`] — the real Stripe API, used when a secret key is
//!   configured.
//! - [`SimulatedGateway`] — deterministic in-process intents for local
//!   development and tests.

pub mod simulated;
pub mod stripe;

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use tracing::warn;

use crate::config::StripeConfig;

pub use simulated::SimulatedGateway;
pub use stripe::StripeGateway;

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway returned an error response.
    #[error("Payment API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a gateway response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Amount cannot be expressed in cents.
    #[error("Amount {0} cannot be converted to cents")]
    InvalidAmount(Decimal),
}

/// A payment intent as seen by the storefront.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub id: String,
    /// Secret the browser needs to complete the payment. Only returned on
    /// creation.
    pub client_secret: Option<String>,
    pub status: String,
}

/// Interface to the payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for the given amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway rejects the request.
    async fn create_payment_intent(
        &self,
        amount: Decimal,
        currency: &str,
        metadata: &[(&str, &str)],
    ) -> Result<PaymentIntent, PaymentError>;

    /// Fetch the current state of a payment intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the intent doesn't exist or the request fails.
    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError>;

    /// Cancel a payment intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the intent cannot be cancelled.
    async fn cancel_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError>;
}

/// Select the gateway for the given configuration.
///
/// Falls back to the simulated gateway when no Stripe secret key is set, so
/// that checkout keeps working in local development.
#[must_use]
pub fn from_config(config: &StripeConfig) -> Arc<dyn PaymentGateway> {
    match &config.secret_key {
        Some(key) => Arc::new(StripeGateway::new(key.clone())),
        None => {
            warn!("Missing Stripe secret key - payments will be simulated");
            Arc::new(SimulatedGateway::new())
        }
    }
}

/// Convert a decimal amount to whole cents, rounding the midpoint away from
/// zero.
pub(crate) fn amount_to_cents(amount: Decimal) -> Result<i64, PaymentError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|cents| cents.to_i64())
        .ok_or(PaymentError::InvalidAmount(amount))
}

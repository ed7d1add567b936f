//! Stripe payment intent client.
//!
//! # API Reference
//!
//! - Base URL: `https://api.stripe.com/v1`
//! - Authentication: secret key via `Authorization: Bearer <key>`
//! - Requests are form-encoded; nested fields use bracket notation
//!   (`metadata[userId]`, `automatic_payment_methods[enabled]`)

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{PaymentError, PaymentGateway, PaymentIntent, amount_to_cents};

/// Stripe API base URL.
const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Payment gateway backed by the Stripe API.
#[derive(Clone)]
pub struct StripeGateway {
    client: Client,
    secret_key: SecretString,
}

impl std::fmt::Debug for StripeGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeGateway")
            .field("secret_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Payment intent as returned by the Stripe API.
#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    id: String,
    client_secret: Option<String>,
    status: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

impl StripeGateway {
    /// Create a new Stripe gateway.
    #[must_use]
    pub fn new(secret_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            secret_key,
        }
    }

    /// Parse a Stripe response, mapping non-2xx statuses to `Api` errors.
    async fn handle_response(
        response: reqwest::Response,
    ) -> Result<PaymentIntent, PaymentError> {
        let status = response.status();

        if status.is_success() {
            let intent: PaymentIntentResponse = response
                .json()
                .await
                .map_err(|e| PaymentError::Parse(format!("Failed to parse response: {e}")))?;

            return Ok(PaymentIntent {
                id: intent.id,
                client_secret: intent.client_secret,
                status: intent.status,
            });
        }

        let message = response
            .json::<ApiErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or_else(|| "Unknown error".to_owned());

        Err(PaymentError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self, metadata), fields(currency = %currency))]
    async fn create_payment_intent(
        &self,
        amount: Decimal,
        currency: &str,
        metadata: &[(&str, &str)],
    ) -> Result<PaymentIntent, PaymentError> {
        let cents = amount_to_cents(amount)?;

        let mut params = vec![
            ("amount".to_owned(), cents.to_string()),
            ("currency".to_owned(), currency.to_owned()),
            (
                "automatic_payment_methods[enabled]".to_owned(),
                "true".to_owned(),
            ),
        ];
        for (key, value) in metadata {
            params.push((format!("metadata[{key}]"), (*value).to_owned()));
        }

        let response = self
            .client
            .post(format!("{STRIPE_API_BASE}/payment_intents"))
            .bearer_auth(self.secret_key.expose_secret())
            .form(&params)
            .send()
            .await?;

        let intent = Self::handle_response(response).await?;
        debug!(intent_id = %intent.id, "Created payment intent");

        Ok(intent)
    }

    #[instrument(skip(self))]
    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        let response = self
            .client
            .get(format!("{STRIPE_API_BASE}/payment_intents/{id}"))
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await?;

        Self::handle_response(response).await
    }

    #[instrument(skip(self))]
    async fn cancel_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        let response = self
            .client
            .post(format!("{STRIPE_API_BASE}/payment_intents/{id}/cancel"))
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await?;

        Self::handle_response(response).await
    }
}

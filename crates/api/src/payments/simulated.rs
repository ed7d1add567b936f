//! Simulated payment gateway for development and tests.
//!
//! Issues deterministic intent IDs from a counter. Retrieval always reports
//! the intent as succeeded, so a checkout can be confirmed end to end
//! without touching Stripe.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::debug;

use super::{PaymentError, PaymentGateway, PaymentIntent};

/// Gateway that fabricates payment intents in process.
#[derive(Debug, Default)]
pub struct SimulatedGateway {
    counter: AtomicU64,
}

impl SimulatedGateway {
    /// Create a new simulated gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn create_payment_intent(
        &self,
        amount: Decimal,
        currency: &str,
        _metadata: &[(&str, &str)],
    ) -> Result<PaymentIntent, PaymentError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(%amount, currency, "Simulating payment intent creation");

        Ok(PaymentIntent {
            id: format!("sim_pi_{n:06}"),
            client_secret: Some(format!("sim_secret_{n:06}")),
            status: "requires_payment_method".to_owned(),
        })
    }

    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        debug!(intent_id = %id, "Simulating payment intent retrieval");

        Ok(PaymentIntent {
            id: id.to_owned(),
            client_secret: None,
            status: "succeeded".to_owned(),
        })
    }

    async fn cancel_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        debug!(intent_id = %id, "Simulating payment intent cancellation");

        Ok(PaymentIntent {
            id: id.to_owned(),
            client_secret: None,
            status: "canceled".to_owned(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_intents_are_sequential() {
        let gateway = SimulatedGateway::new();

        let first = gateway
            .create_payment_intent(Decimal::new(10_00, 2), "usd", &[])
            .await
            .unwrap();
        let second = gateway
            .create_payment_intent(Decimal::new(20_00, 2), "usd", &[])
            .await
            .unwrap();

        assert_eq!(first.id, "sim_pi_000001");
        assert_eq!(first.client_secret.as_deref(), Some("sim_secret_000001"));
        assert_eq!(second.id, "sim_pi_000002");
    }

    #[tokio::test]
    async fn test_retrieval_reports_success() {
        let gateway = SimulatedGateway::new();

        let intent = gateway.retrieve_payment_intent("sim_pi_000001").await.unwrap();
        assert_eq!(intent.status, "succeeded");
        assert_eq!(intent.id, "sim_pi_000001");
    }

    #[tokio::test]
    async fn test_cancellation() {
        let gateway = SimulatedGateway::new();

        let intent = gateway.cancel_payment_intent("sim_pi_000001").await.unwrap();
        assert_eq!(intent.status, "canceled");
    }
}

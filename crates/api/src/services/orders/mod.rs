//! Order workflows: checkout, payment confirmation, and retrieval.
//!
//! The service is the only writer of orders. Checkout runs as a sequence of
//! store calls rather than one transaction: the address is persisted first,
//! then the payment intent is requested, then the order with its items. A
//! failure after the address write leaves that address orphaned; callers get
//! a clean error and can retry checkout from scratch.

mod error;
pub mod validate;

pub use error::OrderError;
pub use validate::{ConfirmPaymentRequest, CreateOrderRequest};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use chrono::{DateTime, Utc};
use marigold_core::{
    OrderId, OrderItemId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, order_total,
};

use crate::models::{AuthContext, NewAddress, NewOrder, Order, OrderDetail};
use crate::payments::PaymentGateway;
use crate::store::{Store, StoreError};

/// Order service.
///
/// Holds borrowed collaborators; handlers construct one per request from
/// application state.
pub struct OrderService<'a> {
    store: &'a dyn Store,
    gateway: &'a dyn PaymentGateway,
    currency: &'a str,
}

/// What `POST /orders` returns to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub payment_intent_id: Option<String>,
}

/// What `POST /payments/confirm` returns to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub id: OrderId,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
}

/// Flattened order for `GET /orders/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: OrderId,
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub payment_intent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
    pub address: AddressView,
}

/// One line of an [`OrderView`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
    pub image: String,
}

/// Shipping address of an [`OrderView`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressView {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(
        store: &'a dyn Store,
        gateway: &'a dyn PaymentGateway,
        currency: &'a str,
    ) -> Self {
        Self {
            store,
            gateway,
            currency,
        }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Place an order for the authenticated caller.
    ///
    /// The total is recomputed here from the submitted line items; the cart
    /// quote the client showed the shopper is never trusted. Unit prices
    /// themselves are still client-supplied (see `DESIGN.md`). Card orders
    /// ask the gateway for a payment intent, but a gateway failure only
    /// drops the intent id; the order is created either way and payment
    /// starts out `PENDING` regardless of method.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for a malformed payload and
    /// `OrderError::Store` if persistence fails. A store failure after the
    /// address write leaves the address behind.
    pub async fn create_order(
        &self,
        auth: &AuthContext,
        request: CreateOrderRequest,
    ) -> Result<OrderSummary, OrderError> {
        let order = validate::validate_order(request)?;

        let total = order_total(
            order
                .items
                .iter()
                .map(|item| (item.unit_price, item.quantity)),
        );

        let address = self
            .store
            .create_address(NewAddress {
                user_id: auth.user_id,
                street: order.address.street,
                city: order.address.city,
                state: order.address.state,
                zip_code: order.address.zip_code,
                country: order.address.country,
            })
            .await?;

        let payment_intent_id = match order.payment_method {
            PaymentMethod::Card => self.request_payment_intent(auth, total).await,
            PaymentMethod::CashOnDelivery => None,
        };

        let created = self
            .store
            .create_order(NewOrder {
                user_id: auth.user_id,
                total,
                payment_method: order.payment_method,
                payment_intent_id,
                address_id: address.id,
                items: order.items,
            })
            .await?;

        info!(
            order_id = %created.id,
            user_id = %auth.user_id,
            %total,
            method = %created.payment_method,
            "Order created"
        );

        Ok(summary(created))
    }

    /// Ask the gateway for a payment intent, swallowing failure.
    ///
    /// Checkout must not be blocked by the payment provider: on any gateway
    /// error the order proceeds without an intent id.
    async fn request_payment_intent(&self, auth: &AuthContext, total: Decimal) -> Option<String> {
        let user_id = auth.user_id.to_string();
        let metadata = [("userId", user_id.as_str())];

        match self
            .gateway
            .create_payment_intent(total, self.currency, &metadata)
            .await
        {
            Ok(intent) => Some(intent.id),
            Err(e) => {
                warn!(error = %e, %total, "Payment intent creation failed; order proceeds without one");
                None
            }
        }
    }

    // =========================================================================
    // Payment confirmation
    // =========================================================================

    /// Confirm payment for an order the caller owns.
    ///
    /// The supplied intent id must exactly match the one stored at checkout.
    /// On a match the order jumps to `PROCESSING`/`COMPLETED`; the gateway
    /// is not consulted again (see `DESIGN.md`).
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for an unknown order,
    /// `OrderError::UpdateForbidden` when the caller is not the owner, and
    /// `OrderError::IntentMismatch` when the intent id differs.
    pub async fn confirm_payment(
        &self,
        auth: &AuthContext,
        request: ConfirmPaymentRequest,
    ) -> Result<PaymentConfirmation, OrderError> {
        let (order_id, payment_intent_id) = validate::validate_confirmation(request)?;

        let order = self
            .store
            .order_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if order.user_id != auth.user_id {
            return Err(OrderError::UpdateForbidden);
        }

        if order.payment_intent_id.as_deref() != Some(payment_intent_id.as_str()) {
            return Err(OrderError::IntentMismatch);
        }

        let updated = self
            .store
            .mark_order_paid(order_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => OrderError::NotFound,
                other => OrderError::Store(other),
            })?;

        info!(order_id = %updated.id, user_id = %auth.user_id, "Payment confirmed");

        Ok(PaymentConfirmation {
            id: updated.id,
            status: updated.status,
            payment_status: updated.payment_status,
        })
    }

    // =========================================================================
    // Retrieval
    // =========================================================================

    /// Load an order with its items and address for display.
    ///
    /// Visible to the owner and to admins only.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for an unknown order and
    /// `OrderError::ViewForbidden` for any other non-admin caller.
    pub async fn get_order(
        &self,
        auth: &AuthContext,
        order_id: OrderId,
    ) -> Result<OrderView, OrderError> {
        let detail = self
            .store
            .order_detail(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if detail.order.user_id != auth.user_id && !auth.role.is_admin() {
            return Err(OrderError::ViewForbidden);
        }

        Ok(view(detail))
    }
}

fn summary(order: Order) -> OrderSummary {
    OrderSummary {
        id: order.id,
        total: order.total,
        payment_method: order.payment_method,
        payment_status: order.payment_status,
        payment_intent_id: order.payment_intent_id,
    }
}

fn view(detail: OrderDetail) -> OrderView {
    let OrderDetail {
        order,
        items,
        address,
    } = detail;

    OrderView {
        id: order.id,
        total: order.total,
        status: order.status,
        payment_method: order.payment_method,
        payment_status: order.payment_status,
        payment_intent_id: order.payment_intent_id,
        created_at: order.created_at,
        updated_at: order.updated_at,
        items: items
            .into_iter()
            .map(|item| OrderItemView {
                id: item.id,
                product_id: item.product_id,
                name: item.name,
                quantity: item.quantity,
                price: item.unit_price,
                image: item.image,
            })
            .collect(),
        address: AddressView {
            street: address.street,
            city: address.city,
            state: address.state,
            zip_code: address.zip_code,
            country: address.country,
        },
    }
}

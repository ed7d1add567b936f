//! Request shapes and validation for the order workflows.
//!
//! Request structs deserialize leniently (every field optional) so that a
//! missing field becomes a first-violation message here instead of a
//! deserializer error. Checks run in payload order and stop at the first
//! failure.

use rust_decimal::Decimal;
use serde::Deserialize;

use marigold_core::{OrderId, PaymentMethod, ProductId};

use super::OrderError;
use crate::models::NewOrderItem;

/// Body of `POST /orders`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Option<Vec<ItemRequest>>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub address: Option<AddressRequest>,
}

/// One cart line as submitted by the client.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    /// Product id.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Shipping address as submitted by the client.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Body of `POST /payments/confirm`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
}

/// An order payload that passed validation.
#[derive(Debug)]
pub struct ValidatedOrder {
    pub items: Vec<NewOrderItem>,
    pub payment_method: PaymentMethod,
    pub address: ValidatedAddress,
}

/// Address fields that passed validation. All non-empty.
#[derive(Debug)]
pub struct ValidatedAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Validate an order creation payload.
///
/// # Errors
///
/// Returns `OrderError::Validation` with the first violated rule's message.
pub fn validate_order(request: CreateOrderRequest) -> Result<ValidatedOrder, OrderError> {
    let items = request
        .items
        .filter(|items| !items.is_empty())
        .ok_or(OrderError::Validation("Order must contain at least one item"))?;

    let mut validated_items = Vec::with_capacity(items.len());
    for item in items {
        validated_items.push(validate_item(item)?);
    }

    let payment_method = request
        .payment_method
        .as_deref()
        .and_then(|method| method.parse::<PaymentMethod>().ok())
        .ok_or(OrderError::Validation(
            "Payment method must be CARD or CASH_ON_DELIVERY",
        ))?;

    let address = request
        .address
        .ok_or(OrderError::Validation("Address is required"))?;
    let address = validate_address(address)?;

    Ok(ValidatedOrder {
        items: validated_items,
        payment_method,
        address,
    })
}

/// Validate a payment confirmation payload.
///
/// # Errors
///
/// Returns `OrderError::Validation` with the first violated rule's message.
pub fn validate_confirmation(
    request: ConfirmPaymentRequest,
) -> Result<(OrderId, String), OrderError> {
    let order_id = request
        .order_id
        .ok_or(OrderError::Validation("orderId is required"))?;
    let order_id: OrderId = order_id
        .parse()
        .map_err(|_| OrderError::Validation("orderId must be a valid UUID"))?;

    let payment_intent_id = request
        .payment_intent_id
        .ok_or(OrderError::Validation("paymentIntentId is required"))?;

    Ok((order_id, payment_intent_id))
}

fn validate_item(item: ItemRequest) -> Result<NewOrderItem, OrderError> {
    let id = item
        .id
        .ok_or(OrderError::Validation("Item id is required"))?;
    let product_id: ProductId = id
        .parse()
        .map_err(|_| OrderError::Validation("Item id must be a valid product id"))?;

    if item.name.is_none() {
        return Err(OrderError::Validation("Item name is required"));
    }

    let price = item
        .price
        .ok_or(OrderError::Validation("Item price is required"))?;
    if price <= Decimal::ZERO {
        return Err(OrderError::Validation("Item price must be a positive number"));
    }

    let quantity = item
        .quantity
        .ok_or(OrderError::Validation("Item quantity is required"))?;
    if quantity == 0 {
        return Err(OrderError::Validation(
            "Item quantity must be a positive integer",
        ));
    }

    if item.image.is_none() {
        return Err(OrderError::Validation("Item image is required"));
    }

    Ok(NewOrderItem {
        product_id,
        quantity,
        unit_price: price,
    })
}

fn validate_address(address: AddressRequest) -> Result<ValidatedAddress, OrderError> {
    let street = require_field(address.street, "Address street is required")?;
    let city = require_field(address.city, "Address city is required")?;
    let state = require_field(address.state, "Address state is required")?;
    let zip_code = require_field(address.zip_code, "Address zipCode is required")?;
    let country = require_field(address.country, "Address country is required")?;

    Ok(ValidatedAddress {
        street,
        city,
        state,
        zip_code,
        country,
    })
}

fn require_field(value: Option<String>, message: &'static str) -> Result<String, OrderError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(OrderError::Validation(message))
}

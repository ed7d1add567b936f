//! Order, order item, and address models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use marigold_core::{
    AddressId, OrderId, OrderItemId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, UserId,
};

/// A shipping address, created once per order and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

/// Data required to create an [`Address`].
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// A placed order.
///
/// `total` is fixed at creation time as the sum of item line totals and is
/// never recomputed afterwards. Only the payment confirmation workflow
/// mutates an order, and only its `status`/`payment_status` fields.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    /// External payment intent identifier. Set only for card orders where
    /// the gateway call succeeded.
    pub payment_intent_id: Option<String>,
    pub address_id: AddressId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line on an order. Snapshots the unit price at order time.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Data required to create an [`Order`] with its items in one write.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_intent_id: Option<String>,
    pub address_id: AddressId,
    pub items: Vec<NewOrderItem>,
}

/// One line of a [`NewOrder`].
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// An order joined with its items and shipping address for display.
///
/// Items carry the product name and primary image from the catalog at read
/// time; everything else is the order-time snapshot.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
    pub address: Address,
}

/// An order item joined with catalog display fields.
#[derive(Debug, Clone)]
pub struct OrderItemDetail {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub image: String,
}

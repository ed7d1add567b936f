//! In-memory implementation of the [`Store`] trait.
//!
//! Backs local development without a database and the workflow tests. Comes
//! preseeded with the product catalog. Data lives behind a single `RwLock`
//! and is lost on shutdown.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use marigold_core::{
    AddressId, Email, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, UserId, UserRole,
};

use super::{Store, StoreError, catalog};
use crate::models::{
    Address, NewAddress, NewOrder, NewUser, Order, OrderDetail, OrderItem, OrderItemDetail,
    Product, User,
};

#[derive(Debug, Default)]
struct Tables {
    /// Users paired with their password hashes.
    users: Vec<(User, String)>,
    products: Vec<Product>,
    addresses: Vec<Address>,
    orders: Vec<Order>,
    /// Items per order, in insertion order.
    order_items: HashMap<OrderId, Vec<OrderItem>>,
}

/// Store that keeps everything in process memory.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create a store preseeded with the product catalog.
    #[must_use]
    pub fn new() -> Self {
        let tables = Tables {
            products: catalog::products(),
            ..Tables::default()
        };
        Self {
            tables: RwLock::new(tables),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    // ===== Users =====

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.write();

        if tables
            .users
            .iter()
            .any(|(user, _)| user.email == new_user.email)
        {
            return Err(StoreError::Conflict("email already exists".to_owned()));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::generate(),
            name: new_user.name,
            email: new_user.email,
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        };
        tables.users.push((user.clone(), new_user.password_hash));

        Ok(user)
    }

    async fn user_by_email(&self, email: &Email) -> Result<Option<(User, String)>, StoreError> {
        let tables = self.read();
        Ok(tables
            .users
            .iter()
            .find(|(user, _)| user.email == *email)
            .cloned())
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let tables = self.read();
        Ok(tables
            .users
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(user, _)| user.clone()))
    }

    // ===== Products =====

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let tables = self.read();
        let mut products = tables.products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let tables = self.read();
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    // ===== Addresses =====

    async fn create_address(&self, new_address: NewAddress) -> Result<Address, StoreError> {
        let mut tables = self.write();

        let address = Address {
            id: AddressId::generate(),
            user_id: new_address.user_id,
            street: new_address.street,
            city: new_address.city,
            state: new_address.state,
            zip_code: new_address.zip_code,
            country: new_address.country,
            created_at: Utc::now(),
        };
        tables.addresses.push(address.clone());

        Ok(address)
    }

    // ===== Orders =====

    async fn create_order(&self, new_order: NewOrder) -> Result<Order, StoreError> {
        let mut tables = self.write();

        for item in &new_order.items {
            if !tables.products.iter().any(|p| p.id == item.product_id) {
                return Err(StoreError::DataCorruption(format!(
                    "order item references missing product {}",
                    item.product_id
                )));
            }
        }

        let now = Utc::now();
        let order = Order {
            id: OrderId::generate(),
            user_id: new_order.user_id,
            total: new_order.total,
            status: OrderStatus::Pending,
            payment_method: new_order.payment_method,
            payment_status: PaymentStatus::Pending,
            payment_intent_id: new_order.payment_intent_id,
            address_id: new_order.address_id,
            created_at: now,
            updated_at: now,
        };

        let items = new_order
            .items
            .into_iter()
            .map(|item| OrderItem {
                id: OrderItemId::generate(),
                order_id: order.id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();

        tables.orders.push(order.clone());
        tables.order_items.insert(order.id, items);

        Ok(order)
    }

    async fn order_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let tables = self.read();
        Ok(tables.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn order_detail(&self, id: OrderId) -> Result<Option<OrderDetail>, StoreError> {
        let tables = self.read();

        let Some(order) = tables.orders.iter().find(|o| o.id == id).cloned() else {
            return Ok(None);
        };

        let items = tables
            .order_items
            .get(&order.id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|item| {
                let product = tables
                    .products
                    .iter()
                    .find(|p| p.id == item.product_id)
                    .ok_or_else(|| {
                        StoreError::DataCorruption(format!(
                            "order item references missing product {}",
                            item.product_id
                        ))
                    })?;

                Ok(OrderItemDetail {
                    id: item.id,
                    product_id: item.product_id,
                    name: product.name.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    image: product.image.clone(),
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let address = tables
            .addresses
            .iter()
            .find(|a| a.id == order.address_id)
            .cloned()
            .ok_or_else(|| {
                StoreError::DataCorruption(format!(
                    "order {} references missing address",
                    order.id
                ))
            })?;

        Ok(Some(OrderDetail {
            order,
            items,
            address,
        }))
    }

    async fn mark_order_paid(&self, id: OrderId) -> Result<Order, StoreError> {
        let mut tables = self.write();

        let order = tables
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound)?;

        order.payment_status = PaymentStatus::Completed;
        order.status = OrderStatus::Processing;
        order.updated_at = Utc::now();

        Ok(order.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use marigold_core::PaymentMethod;

    use super::*;
    use crate::models::NewOrderItem;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test Shopper".to_owned(),
            email: Email::parse(email).unwrap(),
            password_hash: "$argon2id$fake".to_owned(),
        }
    }

    fn new_address(user_id: UserId) -> NewAddress {
        NewAddress {
            user_id,
            street: "123 Main St".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            zip_code: "62701".to_owned(),
            country: "USA".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_create_user_and_fetch() {
        let store = MemoryStore::new();

        let user = store.create_user(new_user("shopper@example.com")).await.unwrap();
        assert_eq!(user.role, UserRole::User);

        let email = Email::parse("shopper@example.com").unwrap();
        let (found, hash) = store.user_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(hash, "$argon2id$fake");

        let by_id = store.user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, email);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();

        store.create_user(new_user("dup@example.com")).await.unwrap();
        let err = store.create_user(new_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_products_listed_by_name() {
        let store = MemoryStore::new();

        let products = store.list_products().await.unwrap();
        assert_eq!(products.len(), 8);

        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn test_order_round_trip_with_detail() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("buyer@example.com")).await.unwrap();
        let address = store.create_address(new_address(user.id)).await.unwrap();

        let products = store.list_products().await.unwrap();
        let first = &products[0];
        let second = &products[1];

        let order = store
            .create_order(NewOrder {
                user_id: user.id,
                total: Decimal::new(100_00, 2),
                payment_method: PaymentMethod::CashOnDelivery,
                payment_intent_id: None,
                address_id: address.id,
                items: vec![
                    NewOrderItem {
                        product_id: first.id,
                        quantity: 2,
                        unit_price: first.price,
                    },
                    NewOrderItem {
                        product_id: second.id,
                        quantity: 1,
                        unit_price: second.price,
                    },
                ],
            })
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);

        let detail = store.order_detail(order.id).await.unwrap().unwrap();
        assert_eq!(detail.items.len(), 2);
        assert_eq!(detail.items[0].name, first.name);
        assert_eq!(detail.items[0].quantity, 2);
        assert_eq!(detail.items[1].name, second.name);
        assert_eq!(detail.address.street, "123 Main St");
    }

    #[tokio::test]
    async fn test_create_order_rejects_unknown_product() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("buyer@example.com")).await.unwrap();
        let address = store.create_address(new_address(user.id)).await.unwrap();

        let err = store
            .create_order(NewOrder {
                user_id: user.id,
                total: Decimal::new(10_00, 2),
                payment_method: PaymentMethod::Card,
                payment_intent_id: None,
                address_id: address.id,
                items: vec![NewOrderItem {
                    product_id: ProductId::generate(),
                    quantity: 1,
                    unit_price: Decimal::new(10_00, 2),
                }],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::DataCorruption(_)));
    }

    #[tokio::test]
    async fn test_mark_order_paid_transitions_statuses() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("buyer@example.com")).await.unwrap();
        let address = store.create_address(new_address(user.id)).await.unwrap();
        let product = &store.list_products().await.unwrap()[0];

        let order = store
            .create_order(NewOrder {
                user_id: user.id,
                total: product.price,
                payment_method: PaymentMethod::Card,
                payment_intent_id: Some("pi_123".to_owned()),
                address_id: address.id,
                items: vec![NewOrderItem {
                    product_id: product.id,
                    quantity: 1,
                    unit_price: product.price,
                }],
            })
            .await
            .unwrap();

        let paid = store.mark_order_paid(order.id).await.unwrap();
        assert_eq!(paid.status, OrderStatus::Processing);
        assert_eq!(paid.payment_status, PaymentStatus::Completed);

        let missing = store.mark_order_paid(OrderId::generate()).await.unwrap_err();
        assert!(matches!(missing, StoreError::NotFound));
    }
}

//! `PostgreSQL` implementation of the [`Store`] trait.
//!
//! Queries use the runtime API with explicit row mapping so the workspace
//! builds without a reachable database. Schema lives in
//! `crates/api/migrations/`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use marigold_core::{
    Email, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, UserId, UserRole,
};

use super::{Store, StoreError};
use crate::models::{
    Address, NewAddress, NewOrder, NewUser, Order, OrderDetail, OrderItemDetail, Product, User,
};

/// Store backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails to apply.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }

    async fn address_by_id(
        &self,
        id: marigold_core::AddressId,
    ) -> Result<Option<Address>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, street, city, state, zip_code, country, created_at
            FROM addresses
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_address).transpose()
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ===== Users =====

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query(
            r"
            INSERT INTO users (id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, role, created_at, updated_at
            ",
        )
        .bind(UserId::generate())
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(UserRole::User)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::Conflict("email already exists".to_owned());
            }
            StoreError::Database(e)
        })?;

        map_user(&row)
    }

    async fn user_by_email(&self, email: &Email) -> Result<Option<(User, String)>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let user = map_user(&row)?;
                let password_hash: String = row.try_get("password_hash")?;
                Ok(Some((user, password_hash)))
            }
            None => Ok(None),
        }
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT id, name, email, role, created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    // ===== Products =====

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, description, price, image, category, created_at, updated_at
            FROM products
            ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_product).collect()
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, price, image, category, created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_product).transpose()
    }

    // ===== Addresses =====

    async fn create_address(&self, new_address: NewAddress) -> Result<Address, StoreError> {
        let row = sqlx::query(
            r"
            INSERT INTO addresses (id, user_id, street, city, state, zip_code, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, street, city, state, zip_code, country, created_at
            ",
        )
        .bind(marigold_core::AddressId::generate())
        .bind(new_address.user_id)
        .bind(&new_address.street)
        .bind(&new_address.city)
        .bind(&new_address.state)
        .bind(&new_address.zip_code)
        .bind(&new_address.country)
        .fetch_one(&self.pool)
        .await?;

        map_address(&row)
    }

    // ===== Orders =====

    async fn create_order(&self, new_order: NewOrder) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r"
            INSERT INTO orders
                (id, user_id, total, status, payment_method, payment_status,
                 payment_intent_id, address_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, total, status, payment_method, payment_status,
                      payment_intent_id, address_id, created_at, updated_at
            ",
        )
        .bind(OrderId::generate())
        .bind(new_order.user_id)
        .bind(new_order.total)
        .bind(OrderStatus::Pending)
        .bind(new_order.payment_method)
        .bind(PaymentStatus::Pending)
        .bind(new_order.payment_intent_id.as_deref())
        .bind(new_order.address_id)
        .fetch_one(&mut *tx)
        .await?;

        let order = map_order(&row)?;

        for (position, item) in (0_i64..).zip(&new_order.items) {
            sqlx::query(
                r"
                INSERT INTO order_items (id, order_id, product_id, quantity, unit_price, position)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(OrderItemId::generate())
            .bind(order.id)
            .bind(item.product_id)
            .bind(i64::from(item.quantity))
            .bind(item.unit_price)
            .bind(position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order)
    }

    async fn order_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, total, status, payment_method, payment_status,
                   payment_intent_id, address_id, created_at, updated_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_order).transpose()
    }

    async fn order_detail(&self, id: OrderId) -> Result<Option<OrderDetail>, StoreError> {
        let Some(order) = self.order_by_id(id).await? else {
            return Ok(None);
        };

        let rows = sqlx::query(
            r"
            SELECT oi.id, oi.product_id, p.name, oi.quantity, oi.unit_price, p.image
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.position
            ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .iter()
            .map(map_item_detail)
            .collect::<Result<Vec<_>, _>>()?;

        let address = self.address_by_id(order.address_id).await?.ok_or_else(|| {
            StoreError::DataCorruption(format!("order {} references missing address", order.id))
        })?;

        Ok(Some(OrderDetail {
            order,
            items,
            address,
        }))
    }

    async fn mark_order_paid(&self, id: OrderId) -> Result<Order, StoreError> {
        let row = sqlx::query(
            r"
            UPDATE orders
            SET payment_status = $2, status = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, total, status, payment_method, payment_status,
                      payment_intent_id, address_id, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(PaymentStatus::Completed)
        .bind(OrderStatus::Processing)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        map_order(&row)
    }
}

fn map_user(row: &PgRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        role: row.try_get("role")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_product(row: &PgRow) -> Result<Product, StoreError> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        image: row.try_get("image")?,
        category: row.try_get("category")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_address(row: &PgRow) -> Result<Address, StoreError> {
    Ok(Address {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        street: row.try_get("street")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        zip_code: row.try_get("zip_code")?,
        country: row.try_get("country")?,
        created_at: row.try_get("created_at")?,
    })
}

fn map_order(row: &PgRow) -> Result<Order, StoreError> {
    Ok(Order {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        total: row.try_get("total")?,
        status: row.try_get("status")?,
        payment_method: row.try_get("payment_method")?,
        payment_status: row.try_get("payment_status")?,
        payment_intent_id: row.try_get("payment_intent_id")?,
        address_id: row.try_get("address_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_item_detail(row: &PgRow) -> Result<OrderItemDetail, StoreError> {
    let quantity: i64 = row.try_get("quantity")?;
    let quantity = u32::try_from(quantity).map_err(|_| {
        StoreError::DataCorruption(format!("order item quantity {quantity} out of range"))
    })?;

    Ok(OrderItemDetail {
        id: row.try_get("id")?,
        product_id: row.try_get("product_id")?,
        name: row.try_get("name")?,
        quantity,
        unit_price: row.try_get("unit_price")?,
        image: row.try_get("image")?,
    })
}

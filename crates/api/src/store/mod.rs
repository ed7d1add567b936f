//! Persistence store for the storefront API.
//!
//! All persistence goes through the [`Store`] trait so that workflows never
//! see a concrete backend. Two implementations exist:
//!
//! - [`PgStore`] — `PostgreSQL` via sqlx, used whenever a database URL is
//!   configured. Migrations live in `crates/api/migrations/` and run via:
//!   ```bash
//!   cargo run -p marigold-cli -- migrate
//!   ```
//! - [`MemoryStore`] — in-process tables behind an `RwLock`, preseeded with
//!   the product catalog. Selected when no database is configured; also the
//!   backend for workflow tests.
//!
//! ## Tables
//!
//! - `users` - Registered shoppers (argon2 password hashes)
//! - `products` - Catalog (seeded via `marigold-cli seed`)
//! - `addresses` - One shipping address per order
//! - `orders` / `order_items` - Orders with price snapshots
//! - `tower_sessions.session` - Session storage (managed by the session store)

pub mod catalog;
pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use marigold_core::{Email, OrderId, ProductId, UserId};

use crate::models::{Address, NewAddress, NewOrder, NewUser, Order, OrderDetail, Product, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store doesn't match expected format.
    #[error("Data corruption: {0}")]
    DataCorruption(String),

    /// Row not found.
    #[error("Not found")]
    NotFound,

    /// Uniqueness conflict (e.g. duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Persistence interface for the storefront workflows.
///
/// Object-safe so the application can hold an `Arc<dyn Store>` chosen once
/// at startup.
#[async_trait]
pub trait Store: Send + Sync {
    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    async fn ping(&self) -> Result<(), StoreError>;

    // ===== Users =====

    /// Create a user with role `USER`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the email is already registered.
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Look up a user and their password hash by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn user_by_email(&self, email: &Email) -> Result<Option<(User, String)>, StoreError>;

    /// Look up a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    // ===== Products =====

    /// List the catalog, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Look up a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    // ===== Addresses =====

    /// Create a shipping address.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn create_address(&self, new_address: NewAddress) -> Result<Address, StoreError>;

    // ===== Orders =====

    /// Create an order together with its items in one atomic write.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; on error nothing is persisted.
    async fn create_order(&self, new_order: NewOrder) -> Result<Order, StoreError>;

    /// Look up an order by ID, without items or address.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn order_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Load an order with its items (joined to product name and image) and
    /// shipping address.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or referenced rows are missing.
    async fn order_detail(&self, id: OrderId) -> Result<Option<OrderDetail>, StoreError>;

    /// Mark an order's payment as completed and move it to processing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order doesn't exist.
    async fn mark_order_paid(&self, id: OrderId) -> Result<Order, StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

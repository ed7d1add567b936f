//! Business logic services.
//!
//! Services hold the workflow logic and are constructed per request over
//! borrowed collaborators. Route handlers translate between HTTP and these
//! services; the services never see axum types.

pub mod auth;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use orders::{OrderError, OrderService};

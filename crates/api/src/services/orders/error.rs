//! Order workflow error types.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Input failed validation. Carries the first violated rule's message.
    #[error("{0}")]
    Validation(&'static str),

    /// Order not found.
    #[error("order not found")]
    NotFound,

    /// Caller doesn't own the order being confirmed.
    #[error("not allowed to update this order")]
    UpdateForbidden,

    /// Caller doesn't own the order and isn't an admin.
    #[error("not allowed to view this order")]
    ViewForbidden,

    /// Supplied payment intent id doesn't match the stored one.
    #[error("payment intent mismatch")]
    IntentMismatch,

    /// Store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

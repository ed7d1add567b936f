//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; service errors convert via `From` and are mapped
//! here to a status code plus a short client-safe message. Nothing escapes
//! the boundary unhandled, and internal detail is never leaked.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::{AuthError, OrderError};
use crate::store::StoreError;

/// JSON extractor whose rejection lands in the [`AppError`] taxonomy.
///
/// Request bodies that are not JSON, or that carry a wrong-typed field,
/// come back as a 400 with the usual `{"message": ...}` body instead of
/// axum's default 422 rejection. Missing fields are not affected; the
/// request structs keep those optional so validation can name the field.
#[derive(Debug, axum::extract::FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(_: axum::extract::rejection::JsonRejection) -> Self {
        Self::BadRequest("Invalid request body".to_string())
    }
}

/// Application-level error type for the storefront API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order workflow failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Store operation failed outside a service.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// User is not authenticated.
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is our fault rather than the client's.
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Store(_) | Self::Internal(_) => true,
            Self::Auth(err) => matches!(err, AuthError::PasswordHash | AuthError::Store(_)),
            Self::Order(err) => matches!(err, OrderError::Store(_)),
            Self::Unauthorized | Self::BadRequest(_) | Self::NotFound(_) => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidName(_)
                | AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::PasswordHash | AuthError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Order(err) => match err {
                OrderError::Validation(_) | OrderError::IntentMismatch => StatusCode::BAD_REQUEST,
                OrderError::NotFound => StatusCode::NOT_FOUND,
                OrderError::UpdateForbidden | OrderError::ViewForbidden => StatusCode::FORBIDDEN,
                OrderError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Client-facing message. Server errors collapse to a generic line.
    fn message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidName(msg)
                | AuthError::InvalidEmail(msg)
                | AuthError::WeakPassword(msg) => (*msg).to_string(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::PasswordHash | AuthError::Store(_) => {
                    "Internal server error".to_string()
                }
            },
            Self::Order(err) => match err {
                OrderError::Validation(msg) => (*msg).to_string(),
                OrderError::IntentMismatch => "Invalid payment intent for this order".to_string(),
                OrderError::NotFound => "Order not found".to_string(),
                OrderError::UpdateForbidden => {
                    "You are not allowed to update this order".to_string()
                }
                OrderError::ViewForbidden => "You are not allowed to view this order".to_string(),
                OrderError::Store(_) => "Internal server error".to_string(),
            },
            Self::Store(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Unauthorized => "You must be logged in".to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::NotFound(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = Json(json!({ "message": self.message() }));
        (self.status(), body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_taxonomy_maps_to_status_codes() {
        assert_eq!(get_status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(AppError::BadRequest("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NotFound("gone".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_errors_map_to_status_codes() {
        assert_eq!(
            get_status(AuthError::UserAlreadyExists.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AuthError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AuthError::WeakPassword("too short").into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AuthError::PasswordHash.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_order_errors_map_to_status_codes() {
        assert_eq!(
            get_status(OrderError::Validation("missing items").into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(OrderError::IntentMismatch.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(OrderError::NotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(OrderError::ViewForbidden.into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(OrderError::UpdateForbidden.into()),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.message(), "Internal server error");

        let err: AppError = OrderError::Store(StoreError::NotFound).into();
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_validation_message_reaches_the_client() {
        let err: AppError = OrderError::Validation("Order must contain at least one item").into();
        assert_eq!(err.message(), "Order must contain at least one item");
    }
}

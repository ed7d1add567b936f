//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use marigold_core::OrderId;

use crate::error::{AppError, AppJson, Result};
use crate::middleware::RequireAuth;
use crate::services::OrderService;
use crate::services::orders::CreateOrderRequest;
use crate::state::AppState;

/// `POST /orders` - Place an order for the authenticated caller.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppJson(body): AppJson<CreateOrderRequest>,
) -> Result<impl IntoResponse> {
    let service = OrderService::new(
        state.store(),
        state.gateway(),
        &state.config().stripe.currency,
    );

    let order = service.create_order(&auth, body).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Order created successfully",
            "order": order,
        })),
    ))
}

/// `GET /orders/{id}` - Order detail for the owner or an admin.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id: OrderId = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid order id".to_string()))?;

    let service = OrderService::new(
        state.store(),
        state.gateway(),
        &state.config().stripe.currency,
    );

    let order = service.get_order(&auth, id).await?;

    Ok(Json(json!({ "order": order })))
}

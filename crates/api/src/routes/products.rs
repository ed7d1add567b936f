//! Product catalog route handlers.
//!
//! Read-only: the catalog is seeded out of band (`marigold-cli seed`).

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use marigold_core::ProductId;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// `GET /products` - List the catalog.
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = state.store().list_products().await?;

    Ok(Json(json!({ "products": products })))
}

/// `GET /products/{id}` - Product detail.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id: ProductId = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid product id".to_string()))?;

    let product = state
        .store()
        .product_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(json!({ "product": product })))
}

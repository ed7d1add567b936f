//! Payment confirmation route handler.

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::error::{AppJson, Result};
use crate::middleware::RequireAuth;
use crate::services::OrderService;
use crate::services::orders::ConfirmPaymentRequest;
use crate::state::AppState;

/// `POST /payments/confirm` - Mark an order paid after the client-side
/// payment flow returns.
pub async fn confirm(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    AppJson(body): AppJson<ConfirmPaymentRequest>,
) -> Result<impl IntoResponse> {
    let service = OrderService::new(
        state.store(),
        state.gateway(),
        &state.config().stripe.currency,
    );

    let order = service.confirm_payment(&auth, body).await?;

    Ok(Json(json!({
        "message": "Payment confirmed",
        "order": order,
    })))
}

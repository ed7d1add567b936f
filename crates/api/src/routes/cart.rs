//! Cart quote route handler.
//!
//! Stateless: evaluates the cart total calculator over posted lines so that
//! every surface shows the same subtotal, tax, and grand total. The
//! authoritative order total is recomputed at checkout, never taken from a
//! quote.

use axum::{Json, response::IntoResponse};
use rust_decimal::Decimal;
use serde::Deserialize;

use marigold_core::CartTotals;

use crate::error::{AppJson, Result};

/// Body of `POST /cart/totals`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default)]
    pub items: Vec<QuoteLine>,
}

/// One cart line in a quote request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub unit_price: Decimal,
    pub quantity: u32,
}

/// `POST /cart/totals` - Quote totals for a set of cart lines.
pub async fn totals(AppJson(body): AppJson<QuoteRequest>) -> Result<impl IntoResponse> {
    let totals = CartTotals::from_lines(
        body.items
            .iter()
            .map(|line| (line.unit_price, line.quantity)),
    );

    Ok(Json(totals))
}

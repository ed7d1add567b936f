//! Money arithmetic for carts and orders.
//!
//! All monetary values are [`Decimal`] to avoid floating-point drift.
//! Totals are computed in two places with deliberately different rules:
//!
//! - Cart quotes include a sales tax line ([`CartTotals`]).
//! - Persisted order totals are the untaxed sum of line totals
//!   ([`order_total`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sales tax rate applied to cart quotes (10%).
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Total for a single line: unit price times quantity.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Sum of line totals across an order. No tax is added.
#[must_use]
pub fn order_total<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, u32)>,
{
    lines
        .into_iter()
        .map(|(price, qty)| line_total(price, qty))
        .sum()
}

/// A cart quote: subtotal, tax, and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Sum of line totals before tax.
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    /// Sales tax on the subtotal.
    #[serde(with = "rust_decimal::serde::str")]
    pub tax: Decimal,
    /// Subtotal plus tax.
    #[serde(with = "rust_decimal::serde::str")]
    pub grand_total: Decimal,
}

impl CartTotals {
    /// Compute totals for a set of cart lines.
    #[must_use]
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (Decimal, u32)>,
    {
        let subtotal = order_total(lines);
        let tax = subtotal * TAX_RATE;
        Self {
            subtotal,
            tax,
            grand_total: subtotal + tax,
        }
    }
}

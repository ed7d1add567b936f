//! Core types for Marigold Market.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{CartTotals, TAX_RATE, line_total, order_total};
pub use status::*;

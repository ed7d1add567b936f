//! Marigold Market API library.
//!
//! This crate provides the storefront API as a library, allowing it to be
//! tested and reused. The binary in `main.rs` wires configuration, the
//! persistence store, the payment gateway, and the router together.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod payments;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

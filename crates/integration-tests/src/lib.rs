//! Integration tests for Marigold Market.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the API (in-memory mode is enough)
//! MARIGOLD_SESSION_SECRET=$(openssl rand -hex 32) cargo run -p marigold-api
//!
//! # Run integration tests against it
//! cargo test -p marigold-integration-tests -- --ignored
//! ```
//!
//! Tests target `MARIGOLD_API_URL` (default `http://localhost:3000`) and
//! register throwaway users with random emails, so they can run repeatedly
//! against the same server.

use reqwest::Client;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("MARIGOLD_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// HTTP client with a cookie store, so the session survives across calls.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique throwaway email for registration tests.
#[must_use]
pub fn random_email() -> String {
    format!("shopper-{}@example.com", uuid::Uuid::new_v4().simple())
}

//! Router-level tests.
//!
//! Drive the full axum router with `tower::ServiceExt::oneshot` over the
//! in-memory store, simulated gateway, and in-memory session store. Covers
//! status codes, JSON body shapes, and the cookie-carried session flow from
//! registration through checkout and payment confirmation.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use marigold_api::config::{AppConfig, StripeConfig};
use marigold_api::middleware::create_session_layer;
use marigold_api::payments::SimulatedGateway;
use marigold_api::routes;
use marigold_api::state::AppState;
use marigold_api::store::MemoryStore;

fn test_config() -> AppConfig {
    AppConfig {
        database_url: None,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("x".repeat(32)),
        stripe: StripeConfig {
            secret_key: None,
            currency: "usd".to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

fn test_app() -> Router {
    let config = test_config();
    let session_layer = create_session_layer(tower_sessions::MemoryStore::default(), &config);
    let state = AppState::new(
        config,
        Arc::new(MemoryStore::new()),
        Arc::new(SimulatedGateway::new()),
    );
    routes::router(state, session_layer)
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

fn post_json(path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_cookie(mut request: Request<Body>, cookie: &str) -> Request<Body> {
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    request
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Cookie value from a Set-Cookie header, without attributes.
fn session_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

/// Register and login a user; returns the session cookie.
async fn login(app: &Router, name: &str, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            &json!({ "name": name, "email": email, "password": "password1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            &json!({ "email": email, "password": "password1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    session_cookie(&response)
}

/// First product in the catalog as `(id, name, image)`.
async fn first_product(app: &Router) -> (String, String, String) {
    let response = app.clone().oneshot(get("/products")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let product = &body["products"][0];
    (
        product["id"].as_str().unwrap().to_string(),
        product["name"].as_str().unwrap().to_string(),
        product["image"].as_str().unwrap().to_string(),
    )
}

fn order_body(product: &(String, String, String), method: &str) -> Value {
    json!({
        "items": [{
            "id": product.0,
            "name": product.1,
            "price": 10,
            "quantity": 2,
            "image": product.2,
        }],
        "paymentMethod": method,
        "address": {
            "street": "123 Main St",
            "city": "Springfield",
            "state": "IL",
            "zipCode": "62701",
            "country": "USA",
        },
    })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = test_app();

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/health/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Registration and login
// =============================================================================

#[tokio::test]
async fn test_register_returns_user_without_password() {
    let app = test_app();

    let response = app
        .oneshot(post_json(
            "/auth/register",
            &json!({ "name": "Ann", "email": "ann@example.com", "password": "password1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["user"]["name"], "Ann");
    assert_eq!(body["user"]["email"], "ann@example.com");
    assert_eq!(body["user"]["role"], "USER");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = test_app();

    let body = json!({ "name": "Ann", "email": "ann@example.com", "password": "password1" });
    let response = app
        .clone()
        .oneshot(post_json("/auth/register", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post_json("/auth/register", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["message"], "An account with this email already exists");
}

#[tokio::test]
async fn test_register_validation_messages() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/auth/register", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Name must be at least 2 characters long");

    let response = app
        .oneshot(post_json(
            "/auth/register",
            &json!({ "name": "Ann", "email": "ann@example.com", "password": "short" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Password must be at least 8 characters long");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            &json!({ "name": "Ann", "email": "ann@example.com", "password": "password1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post_json(
            "/auth/login",
            &json!({ "email": "ann@example.com", "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_products_listing_and_detail() {
    let app = test_app();

    let response = app.clone().oneshot(get("/products")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["products"].as_array().unwrap().len(), 8);

    let id = body["products"][0]["id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(get(&format!("/products/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/products/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/products/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Cart quote
// =============================================================================

#[tokio::test]
async fn test_cart_totals_quote() {
    let app = test_app();

    let response = app
        .oneshot(post_json(
            "/cart/totals",
            &json!({ "items": [{ "unitPrice": "10.00", "quantity": 2 }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["subtotal"], "20.00");
    assert_eq!(body["tax"], "2.0000");
    assert_eq!(body["grandTotal"], "22.0000");
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_orders_require_authentication() {
    let app = test_app();
    let product = first_product(&app).await;

    let response = app
        .clone()
        .oneshot(post_json("/orders", &order_body(&product, "CARD")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get("/orders/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cash_on_delivery_checkout_flow() {
    let app = test_app();
    let cookie = login(&app, "Ann", "ann@example.com").await;
    let product = first_product(&app).await;

    let response = app
        .clone()
        .oneshot(with_cookie(
            post_json("/orders", &order_body(&product, "CASH_ON_DELIVERY")),
            &cookie,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["order"]["total"], "20");
    assert_eq!(body["order"]["paymentStatus"], "PENDING");
    assert_eq!(body["order"]["paymentIntentId"], Value::Null);
    let order_id = body["order"]["id"].as_str().unwrap().to_string();

    // Owner can read it back, with items joined to catalog display fields
    let response = app
        .clone()
        .oneshot(with_cookie(get(&format!("/orders/{order_id}")), &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["order"]["status"], "PENDING");
    assert_eq!(body["order"]["items"][0]["name"], product.1);
    assert_eq!(body["order"]["items"][0]["quantity"], 2);
    assert_eq!(body["order"]["address"]["zipCode"], "62701");
}

#[tokio::test]
async fn test_order_validation_failure_returns_message() {
    let app = test_app();
    let cookie = login(&app, "Ann", "ann@example.com").await;

    let response = app
        .oneshot(with_cookie(
            post_json("/orders", &json!({ "items": [] })),
            &cookie,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Order must contain at least one item");
}

#[tokio::test]
async fn test_wrong_typed_fields_are_bad_requests() {
    let app = test_app();
    let cookie = login(&app, "Ann", "ann@example.com").await;
    let product = first_product(&app).await;

    // Fractional quantity fails body deserialization, not with a 422
    let mut body = order_body(&product, "CASH_ON_DELIVERY");
    body["items"][0]["quantity"] = json!(2.5);
    let response = app
        .clone()
        .oneshot(with_cookie(post_json("/orders", &body), &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid request body");

    // Same taxonomy on the unauthenticated quote endpoint
    let response = app
        .oneshot(post_json(
            "/cart/totals",
            &json!({ "items": [{ "unitPrice": true, "quantity": 1 }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_invalid_id_is_bad_request() {
    let app = test_app();
    let cookie = login(&app, "Ann", "ann@example.com").await;

    let response = app
        .oneshot(with_cookie(get("/orders/not-a-uuid"), &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_access_control_matrix() {
    let app = test_app();
    let ann = login(&app, "Ann", "ann@example.com").await;
    let product = first_product(&app).await;

    let response = app
        .clone()
        .oneshot(with_cookie(
            post_json("/orders", &order_body(&product, "CASH_ON_DELIVERY")),
            &ann,
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let order_id = body["order"]["id"].as_str().unwrap().to_string();

    // A different shopper gets a 403
    let bob = login(&app, "Bob", "bob@example.com").await;
    let response = app
        .clone()
        .oneshot(with_cookie(get(&format!("/orders/{order_id}")), &bob))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // An unknown order is a 404 for its would-be owner
    let response = app
        .oneshot(with_cookie(
            get("/orders/00000000-0000-0000-0000-000000000000"),
            &ann,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Payment confirmation
// =============================================================================

#[tokio::test]
async fn test_card_checkout_and_confirmation_flow() {
    let app = test_app();
    let cookie = login(&app, "Ann", "ann@example.com").await;
    let product = first_product(&app).await;

    let response = app
        .clone()
        .oneshot(with_cookie(
            post_json("/orders", &order_body(&product, "CARD")),
            &cookie,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    let order_id = body["order"]["id"].as_str().unwrap().to_string();
    let intent_id = body["order"]["paymentIntentId"].as_str().unwrap().to_string();
    assert!(intent_id.starts_with("sim_pi_"));

    // Wrong intent id is a validation failure
    let response = app
        .clone()
        .oneshot(with_cookie(
            post_json(
                "/payments/confirm",
                &json!({ "orderId": order_id, "paymentIntentId": "pi_wrong" }),
            ),
            &cookie,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Matching intent id flips the order to paid/processing
    let response = app
        .clone()
        .oneshot(with_cookie(
            post_json(
                "/payments/confirm",
                &json!({ "orderId": order_id, "paymentIntentId": intent_id }),
            ),
            &cookie,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["order"]["status"], "PROCESSING");
    assert_eq!(body["order"]["paymentStatus"], "COMPLETED");
}

#[tokio::test]
async fn test_confirmation_error_statuses() {
    let app = test_app();
    let cookie = login(&app, "Ann", "ann@example.com").await;

    // Unknown order
    let response = app
        .clone()
        .oneshot(with_cookie(
            post_json(
                "/payments/confirm",
                &json!({
                    "orderId": "00000000-0000-0000-0000-000000000000",
                    "paymentIntentId": "pi_x",
                }),
            ),
            &cookie,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Malformed order id
    let response = app
        .clone()
        .oneshot(with_cookie(
            post_json(
                "/payments/confirm",
                &json!({ "orderId": "not-a-uuid", "paymentIntentId": "pi_x" }),
            ),
            &cookie,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "orderId must be a valid UUID");

    // No session at all
    let response = app
        .oneshot(post_json(
            "/payments/confirm",
            &json!({
                "orderId": "00000000-0000-0000-0000-000000000000",
                "paymentIntentId": "pi_x",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Logout
// =============================================================================

#[tokio::test]
async fn test_logout_ends_the_session() {
    let app = test_app();
    let cookie = login(&app, "Ann", "ann@example.com").await;

    let response = app
        .clone()
        .oneshot(with_cookie(
            post_json("/auth/logout", &json!({})),
            &cookie,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(with_cookie(
            get("/orders/00000000-0000-0000-0000-000000000000"),
            &cookie,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

//! End-to-end API tests against an in-memory database.
//!
//! Each test builds the full router and drives it with
//! `tower::ServiceExt::oneshot`, exercising the same code paths a real
//! terminal would hit.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use whiz_db::{Database, DbConfig};
use whiz_pos_api::{build_router, AppState, Config};

fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_path: ":memory:".to_string(),
        jwt_secret: "integration-test-secret".to_string(),
        jwt_access_lifetime_secs: 3600,
        jwt_refresh_lifetime_secs: 86400,
        document_output_dir: std::env::temp_dir()
            .join(format!("whiz-pos-api-test-{}", std::process::id()))
            .display()
            .to_string(),
        template_dir: None,
        mpesa: None,
    }
}

async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    build_router(AppState::new(db, test_config()))
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Registers a business and logs the admin in; returns (app, token).
async fn registered_app() -> (Router, String) {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/businesses/register",
            None,
            json!({
                "business_name": "Kagwe General Store",
                "admin_name": "Jane Wanjiku",
                "admin_email": "jane@kagwe.shop",
                "admin_pin": "4821"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/auth/login-pin",
            None,
            json!({ "email": "jane@kagwe.shop", "pin": "4821" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["access_token"].as_str().unwrap().to_string();
    (app, token)
}

/// Creates a product and returns its id.
async fn create_product(app: &Router, token: &str, name: &str, price_cents: i64, stock: i64) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/products",
            Some(token),
            json!({ "name": name, "price_cents": price_cents, "stock": stock }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_connected_database() {
    let app = test_app().await;

    let response = app.oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn registration_returns_api_key_and_rejects_duplicates() {
    let app = test_app().await;

    let register = json!({
        "business_name": "Kagwe General Store",
        "admin_name": "Jane Wanjiku",
        "admin_email": "jane@kagwe.shop",
        "admin_pin": "4821"
    });

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/businesses/register",
            None,
            register.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(!body["business"]["api_key"].as_str().unwrap().is_empty());
    assert_eq!(body["admin"]["email"], "jane@kagwe.shop");

    // Same admin email again is a conflict
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/businesses/register",
            None,
            register,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_rejects_wrong_pin() {
    let (app, _token) = registered_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/auth/login-pin",
            None,
            json!({ "email": "jane@kagwe.shop", "pin": "0000" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_bearer_token() {
    let (app, _token) = registered_app().await;

    let response = app
        .oneshot(get_request("/v1/products", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sale_decrements_stock_and_renders_receipt() {
    let (app, token) = registered_app().await;
    let product_id = create_product(&app, &token, "Bread", 6000, 10).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/transactions",
            Some(&token),
            json!({
                "items": [{ "product_id": product_id, "quantity": 2 }],
                "payment_method": "cash"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let txn_id = body["transaction"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["transaction"]["total_cents"], 12000);

    // Stock went 10 → 8
    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/v1/products/{product_id}"),
            Some(&token),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["stock"], 8);

    // Receipt renders with no unresolved placeholders
    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/v1/transactions/{txn_id}/receipt"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let html = body["html"].as_str().unwrap();
    assert!(!html.contains("{{"));
    assert!(html.contains("Kagwe General Store"));
    assert!(html.contains("Ksh 120.00"));
}

#[tokio::test]
async fn oversell_is_rejected() {
    let (app, token) = registered_app().await;
    let product_id = create_product(&app, &token, "Bread", 6000, 1).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/transactions",
            Some(&token),
            json!({
                "items": [{ "product_id": product_id, "quantity": 5 }],
                "payment_method": "cash"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_series_sums_todays_sales() {
    let (app, token) = registered_app().await;
    let product_id = create_product(&app, &token, "Bread", 6000, 50).await;

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/transactions",
                Some(&token),
                json!({
                    "items": [{ "product_id": product_id, "quantity": 1 }],
                    "payment_method": "mpesa"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get_request(
            "/v1/dashboard/sales-series?period=today",
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let labels = body["labels"].as_array().unwrap();
    let values = body["values"].as_array().unwrap();
    assert_eq!(labels.len(), 24);
    assert_eq!(values.len(), 24);

    let sum: i64 = values.iter().map(|v| v.as_i64().unwrap()).sum();
    assert_eq!(sum, 18000);

    // Fixed bucket counts for the other periods
    for (period, expected) in [("week", 7), ("month", 30), ("year", 12)] {
        let response = app
            .clone()
            .oneshot(get_request(
                &format!("/v1/dashboard/sales-series?period={period}"),
                Some(&token),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["labels"].as_array().unwrap().len(), expected);
    }
}

#[tokio::test]
async fn closing_report_splits_payment_methods() {
    let (app, token) = registered_app().await;
    let product_id = create_product(&app, &token, "Bread", 6000, 50).await;

    for method in ["cash", "cash", "mpesa"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/transactions",
                Some(&token),
                json!({
                    "items": [{ "product_id": product_id, "quantity": 1 }],
                    "payment_method": method
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get_request("/v1/reports/closing", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total_cash_cents"], 12000);
    assert_eq!(body["total_mpesa_cents"], 6000);
    assert_eq!(body["grand_total_cents"], 18000);

    let html = body["html"].as_str().unwrap();
    assert!(!html.contains("{{"));
    assert!(html.contains("ALL ITEMS SOLD"));
    assert!(html.contains("User: Jane Wanjiku"));
}

#[tokio::test]
async fn device_linking_exchanges_api_key_for_token() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/businesses/register",
            None,
            json!({
                "business_name": "Kagwe General Store",
                "admin_name": "Jane Wanjiku",
                "admin_email": "jane@kagwe.shop",
                "admin_pin": "4821"
            }),
        ))
        .await
        .unwrap();
    let api_key = body_json(response).await["business"]["api_key"]
        .as_str()
        .unwrap()
        .to_string();

    let link = |key: String| {
        json_request(
            "POST",
            "/v1/devices/link",
            None,
            json!({
                "api_key": key,
                "fingerprint": "fp-desktop-001",
                "device_type": "desktop"
            }),
        )
    };

    let response = app.clone().oneshot(link(api_key.clone())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let first_device_id = body["device_id"].as_str().unwrap().to_string();
    assert!(!body["device_token"].as_str().unwrap().is_empty());
    assert_eq!(body["branding"]["primary_color"], "#0047FF");

    // Linking the same fingerprint again reuses the device record
    let response = app.clone().oneshot(link(api_key)).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["device_id"].as_str().unwrap(), first_device_id);

    // Unknown key is unauthorized
    let response = app
        .oneshot(link("WRONG-KEY".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mpesa_endpoints_are_unavailable_without_credentials() {
    let (app, token) = registered_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/mpesa/stk-push",
            Some(&token),
            json!({ "amount": 100, "phone_number": "254712345678" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn expense_and_loyalty_records_round_trip() {
    let (app, token) = registered_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/expenses",
            Some(&token),
            json!({ "description": "Electricity token", "amount_cents": 50000 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["recorded_by"], "Jane Wanjiku");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/loyalty",
            Some(&token),
            json!({ "name": "John Kamau", "phone": "254712345678" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/v1/loyalty", Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["tier"], "Bronze");
}

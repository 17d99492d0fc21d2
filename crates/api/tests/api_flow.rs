//! End-to-end tests driving the full router (same middleware stack as the
//! production binary) against a real database.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use milkbook_api::auth::jwt::JwtConfig;
use milkbook_api::config::ServerConfig;
use milkbook_api::router::build_app_router;
use milkbook_api::state::AppState;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        notification_keep: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            token_expiry_days: 7,
        },
    }
}

fn app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Send a JSON request, returning status and parsed JSON body (when any).
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Register a seller and return their token.
async fn register_seller(app: &Router, phone: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/seller/register",
        None,
        Some(json!({
            "name": "Ram Dairy",
            "phone": phone,
            "password": "secret-123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register: {body}");
    body["token"].as_str().expect("token").to_string()
}

/// Create a customer under the given seller, backdate their registration so
/// historical ledger dates are writable, and return the customer id.
async fn create_customer(app: &Router, pool: &PgPool, token: &str, phone: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/customers",
        Some(token),
        Some(json!({
            "name": "Asha Rani",
            "phone": phone,
            "password": "secret-456",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create customer: {body}");
    let id = body["data"]["id"].as_i64().expect("customer id");

    sqlx::query("UPDATE customers SET created_at = '2024-01-10T00:00:00Z' WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .expect("backdate registration");

    id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health(pool: PgPool) {
    let app = app(pool);
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_ledger_flow_and_bill(pool: PgPool) {
    let app = app(pool.clone());
    let token = register_seller(&app, "9999101").await;
    let customer_id = create_customer(&app, &pool, &token, "8888101").await;

    // A day before the (backdated) registration is rejected.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/customers/{customer_id}/milk"),
        Some(&token),
        Some(json!({"date": "2024-01-05", "quantity": 2, "pricePerLitre": 50, "fat": 4.5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    // A valid delivery stores the derived total.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/customers/{customer_id}/milk"),
        Some(&token),
        Some(json!({"date": "2024-01-15", "quantity": 2, "pricePerLitre": 50, "fat": 4.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let first_id = body["data"]["id"].as_i64().expect("entry id");
    assert_eq!(body["data"]["total"].as_f64(), Some(100.0));

    // Re-writing the same day replaces the entry (fresh id, second values).
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/customers/{customer_id}/milk"),
        Some(&token),
        Some(json!({"date": "2024-01-15", "quantity": 3, "pricePerLitre": 55, "fat": 4.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let second_id = body["data"]["id"].as_i64().expect("entry id");
    assert_ne!(first_id, second_id);
    assert_eq!(body["data"]["total"].as_f64(), Some(165.0));

    // Marking leave on the same day discards the delivery.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/customers/{customer_id}/milk/leave"),
        Some(&token),
        Some(json!({"date": "2024-01-15"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(body["data"]["quantity"].is_null());
    assert!(body["data"]["total"].is_null());

    // A second delivery later in the month.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/customers/{customer_id}/milk"),
        Some(&token),
        Some(json!({"date": "2024-01-20", "quantity": 1, "pricePerLitre": 40, "fat": 3.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    // The monthly bill streams a PDF attachment.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/v1/customers/{customer_id}/bill?month=2024-01"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/pdf")
    );
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .expect("content-disposition")
        .to_string();
    assert!(disposition.contains("bill-Asha_Rani-2024-01.pdf"), "{disposition}");
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    assert!(bytes.starts_with(b"%PDF"), "bill must be a PDF stream");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_upsert_validation(pool: PgPool) {
    let app = app(pool.clone());
    let token = register_seller(&app, "9999102").await;
    let customer_id = create_customer(&app, &pool, &token, "8888102").await;

    // Non-positive quantity names the field.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/customers/{customer_id}/milk"),
        Some(&token),
        Some(json!({"date": "2024-02-01", "quantity": 0, "pricePerLitre": 50, "fat": 4.5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"].as_str().unwrap_or_default().contains("quantity"),
        "{body}"
    );

    // Malformed dates are rejected.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/customers/{customer_id}/milk"),
        Some(&token),
        Some(json!({"date": "01/02/2024", "quantity": 2, "pricePerLitre": 50, "fat": 4.5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Malformed month patterns are rejected on the bill.
    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/customers/{customer_id}/bill?month=2024-1"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_foreign_customers_look_missing(pool: PgPool) {
    let app = app(pool.clone());
    let owner = register_seller(&app, "9999103").await;
    let other = register_seller(&app, "9999104").await;
    let customer_id = create_customer(&app, &pool, &owner, "8888103").await;

    // A different seller sees 404, not 403: ownership is not leaked.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/customers/{customer_id}/milk"),
        Some(&other),
        Some(json!({"date": "2024-02-01", "quantity": 2, "pricePerLitre": 50, "fat": 4.5})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // No token at all is a 401.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/customers/{customer_id}/milk"),
        None,
        Some(json!({"date": "2024-02-01", "quantity": 2, "pricePerLitre": 50, "fat": 4.5})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_entry_by_id_and_date(pool: PgPool) {
    let app = app(pool.clone());
    let token = register_seller(&app, "9999105").await;
    let customer_id = create_customer(&app, &pool, &token, "8888105").await;

    let (_, body) = send(
        &app,
        "POST",
        &format!("/api/v1/customers/{customer_id}/milk"),
        Some(&token),
        Some(json!({"date": "2024-03-01", "quantity": 2, "pricePerLitre": 50, "fat": 4.5})),
    )
    .await;
    let entry_id = body["data"]["id"].as_i64().expect("entry id");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/customers/{customer_id}/milk/{entry_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Deleting the same entry again reports not found.
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/customers/{customer_id}/milk/{entry_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Delete by date.
    send(
        &app,
        "POST",
        &format!("/api/v1/customers/{customer_id}/milk"),
        Some(&token),
        Some(json!({"date": "2024-03-02", "quantity": 2, "pricePerLitre": 50, "fat": 4.5})),
    )
    .await;
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/customers/{customer_id}/milk?date=2024-03-02"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Missing date parameter is a bad request.
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/customers/{customer_id}/milk"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_customer_profile_and_notifications(pool: PgPool) {
    let app = app(pool.clone());
    let seller_token = register_seller(&app, "9999106").await;
    let customer_id = create_customer(&app, &pool, &seller_token, "8888106").await;

    send(
        &app,
        "POST",
        &format!("/api/v1/customers/{customer_id}/milk"),
        Some(&seller_token),
        Some(json!({"date": "2024-04-01", "quantity": 2, "pricePerLitre": 50, "fat": 4.5})),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/api/v1/customers/{customer_id}/milk/leave"),
        Some(&seller_token),
        Some(json!({"date": "2024-04-02"})),
    )
    .await;

    // Customer logs in with their own credentials.
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/customer/login",
        None,
        Some(json!({"phone": "8888106", "password": "secret-456"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let customer_token = body["token"].as_str().expect("token").to_string();

    // A seller token must not pass for customer-facing routes.
    let (status, _) = send(&app, "GET", "/api/v1/me", Some(&seller_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Profile carries the ledger and the seller identity.
    let (status, body) = send(&app, "GET", "/api/v1/me", Some(&customer_token), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["customer"]["id"].as_i64(), Some(customer_id));
    assert_eq!(body["data"]["entries"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"]["seller"]["name"], "Ram Dairy");

    // Notification feed: most recent first, leave on top.
    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/me/notifications?limit=10",
        Some(&customer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let feed = body["data"].as_array().expect("feed");
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0]["kind"], "leave");
    assert_eq!(feed[1]["kind"], "send");
    assert_eq!(feed[1]["quantity"].as_f64(), Some(2.0));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_customer_management(pool: PgPool) {
    let app = app(pool.clone());
    let token = register_seller(&app, "9999107").await;
    let customer_id = create_customer(&app, &pool, &token, "8888107").await;

    // Duplicate phone is a conflict.
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/customers",
        Some(&token),
        Some(json!({"name": "Other", "phone": "8888107", "password": "secret-789"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Deactivate, then the customer can no longer log in.
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/v1/customers/{customer_id}/active"),
        Some(&token),
        Some(json!({"isActive": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["is_active"].as_bool(), Some(false));

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth/customer/login",
        None,
        Some(json!({"phone": "8888107", "password": "secret-456"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Listing shows the one customer; deleting empties the list.
    let (_, body) = send(&app, "GET", "/api/v1/customers", Some(&token), None).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/customers/{customer_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", "/api/v1/customers", Some(&token), None).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
}

//! HTTP API Integration Tests
//!
//! Drives the full router over a SQLite store with `tower::ServiceExt::oneshot`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use order_engine::application::dto::{OrderDto, OrderPageDto};
use order_engine::application::use_cases::{LifecycleSettings, PlacementSettings};
use order_engine::error::HttpErrorResponse;
use order_engine::infrastructure::http::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use order_engine::{
    AppState, Money, NoOpEventPublisher, OrderStatus, Product, ProductCatalog, ProductId,
    SqliteOrderStore, SqliteSettings, create_router,
};
use rust_decimal_macros::dec;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

const ALICE: (&str, &str) = ("alice", "customer");
const BOB: (&str, &str) = ("bob", "customer");
const ADMIN: (&str, &str) = ("ops", "admin");

async fn app() -> (Router, Arc<SqliteOrderStore>) {
    let store = Arc::new(
        SqliteOrderStore::connect(&SqliteSettings::default())
            .await
            .expect("in-memory store"),
    );
    let product = Product::new(
        ProductId::new("lamp"),
        "Desk Lamp",
        Money::new(dec!(100.00)),
        5,
        Some("lighting".to_string()),
    )
    .unwrap();
    store.upsert_product(&product).await.unwrap();

    let state = AppState::new(
        Arc::clone(&store),
        Arc::new(NoOpEventPublisher),
        PlacementSettings::default(),
        LifecycleSettings::default(),
        50,
    );
    (create_router(state), store)
}

fn request(method: &str, uri: &str, user: Option<(&str, &str)>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((id, role)) = user {
        builder = builder
            .header(USER_ID_HEADER, id)
            .header(USER_ROLE_HEADER, role);
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.unwrap()
}

async fn json<T: DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn place(app: &Router, user: (&str, &str), qty: i64) -> axum::response::Response {
    let body = format!(
        r#"{{"items":[{{"product_id":"lamp","quantity":{qty}}}],"shipping_address":"12 Main St","payment_method":"STRIPE"}}"#
    );
    send(app, request("POST", "/api/v1/orders", Some(user), Some(&body))).await
}

#[tokio::test]
async fn test_place_then_fetch_order() {
    let (app, store) = app().await;

    let response = place(&app, ALICE, 3).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: OrderDto = json(response).await;
    assert_eq!(created.total, Money::new(dec!(300.00)));
    assert_eq!(created.status, OrderStatus::Pending);

    let response = send(
        &app,
        request("GET", &format!("/api/v1/orders/{}", created.id), Some(ALICE), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: OrderDto = json(response).await;
    assert_eq!(fetched, created);

    let lamp = store
        .find_product(&ProductId::new("lamp"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lamp.available.value(), 2);
}

#[tokio::test]
async fn test_oversell_returns_conflict_with_details() {
    let (app, _) = app().await;
    assert_eq!(place(&app, ALICE, 3).await.status(), StatusCode::CREATED);

    let response = place(&app, BOB, 3).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: HttpErrorResponse = json(response).await;
    assert_eq!(body.code, "INSUFFICIENT_STOCK");
    assert_eq!(body.details.get("product_id").map(String::as_str), Some("lamp"));
    assert_eq!(body.details.get("available").map(String::as_str), Some("2"));
}

#[tokio::test]
async fn test_other_customers_order_is_not_found() {
    let (app, _) = app().await;
    let created: OrderDto = json(place(&app, BOB, 1).await).await;

    let response = send(
        &app,
        request("GET", &format!("/api/v1/orders/{}", created.id), Some(ALICE), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_only_shows_own_orders() {
    let (app, _) = app().await;
    place(&app, ALICE, 1).await;
    place(&app, BOB, 1).await;

    let response = send(&app, request("GET", "/api/v1/orders?page=1&limit=10", Some(ALICE), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page: OrderPageDto = json(response).await;
    assert_eq!(page.total, 1);
    assert_eq!(page.orders[0].user_id, "alice");

    let response = send(&app, request("GET", "/api/v1/orders", Some(ADMIN), None)).await;
    let page: OrderPageDto = json(response).await;
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn test_oversized_page_is_bad_request() {
    let (app, _) = app().await;

    let response = send(&app, request("GET", "/api/v1/orders?limit=51", Some(ALICE), None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_walks_order_through_lifecycle() {
    let (app, _) = app().await;
    let created: OrderDto = json(place(&app, ALICE, 1).await).await;
    let uri = format!("/api/v1/admin/orders/{}/status", created.id);

    let skip = send(&app, request("PUT", &uri, Some(ADMIN), Some(r#"{"status":"SHIPPED"}"#))).await;
    assert_eq!(skip.status(), StatusCode::CONFLICT);
    let body: HttpErrorResponse = json(skip).await;
    assert_eq!(body.code, "INVALID_TRANSITION");

    for status in ["PAID", "SHIPPED", "DELIVERED"] {
        let body = format!(r#"{{"status":"{status}"}}"#);
        let response = send(&app, request("PUT", &uri, Some(ADMIN), Some(&body))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = send(
        &app,
        request("GET", &format!("/api/v1/orders/{}", created.id), Some(ALICE), None),
    )
    .await;
    let fetched: OrderDto = json(response).await;
    assert_eq!(fetched.status, OrderStatus::Delivered);
}

#[tokio::test]
async fn test_customer_cancels_pending_order() {
    let (app, _) = app().await;
    let created: OrderDto = json(place(&app, ALICE, 1).await).await;
    let uri = format!("/api/v1/orders/{}/cancel", created.id);

    let response = send(&app, request("POST", &uri, Some(BOB), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, request("POST", &uri, Some(ALICE), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cancelled: OrderDto = json(response).await;
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    // Only a pending order can be cancelled by its owner.
    let again = send(&app, request("POST", &uri, Some(ALICE), None)).await;
    assert_eq!(again.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_requires_admin() {
    let (app, _) = app().await;
    let created: OrderDto = json(place(&app, ALICE, 1).await).await;
    let uri = format!("/api/v1/admin/orders/{}", created.id);

    let response = send(&app, request("DELETE", &uri, Some(ALICE), None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, request("DELETE", &uri, Some(ADMIN), None)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, request("DELETE", &uri, Some(ADMIN), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_role_is_unauthenticated() {
    let (app, _) = app().await;

    let response = send(&app, request("GET", "/api/v1/orders", Some(("alice", "root")), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_items_is_bad_request() {
    let (app, _) = app().await;

    let response = send(
        &app,
        request(
            "POST",
            "/api/v1/orders",
            Some(ALICE),
            Some(r#"{"items":[],"shipping_address":"12 Main St"}"#),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: HttpErrorResponse = json(response).await;
    assert_eq!(body.code, "INVALID_ARGUMENT");
}

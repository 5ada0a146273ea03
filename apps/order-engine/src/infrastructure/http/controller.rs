//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to application use cases.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};

use crate::application::dto::{
    ListOrdersRequestDto, OrderDto, OrderPageDto, PlaceOrderRequestDto, TransitionStatusRequestDto,
};
use crate::application::ports::EventPublisherPort;
use crate::application::use_cases::{
    DeleteOrderUseCase, LifecycleSettings, OrderQueryUseCase, PlaceOrderUseCase,
    PlacementSettings, TransitionOrderStatusUseCase,
};
use crate::domain::order_management::{OrderError, OrderRepository, OrderStatus, OrderStore};
use crate::domain::shared::OrderId;
use crate::error::ApiError;

use super::identity::Identity;
use super::response::HealthResponse;

/// Application state shared across handlers.
pub struct AppState<S, E>
where
    S: OrderStore + OrderRepository,
    E: EventPublisherPort,
{
    /// Use case for placing orders.
    pub place_order: Arc<PlaceOrderUseCase<S, E>>,
    /// Use case for listing and fetching orders.
    pub query_orders: Arc<OrderQueryUseCase<S>>,
    /// Use case for status changes.
    pub transition_status: Arc<TransitionOrderStatusUseCase<S, E>>,
    /// Use case for deleting orders.
    pub delete_order: Arc<DeleteOrderUseCase<S, E>>,
    /// Application version.
    pub version: String,
}

impl<S, E> AppState<S, E>
where
    S: OrderStore + OrderRepository,
    E: EventPublisherPort,
{
    /// Wire every use case to one store and one publisher.
    pub fn new(
        store: Arc<S>,
        event_publisher: Arc<E>,
        placement: PlacementSettings,
        lifecycle: LifecycleSettings,
        max_page_size: u32,
    ) -> Self {
        Self {
            place_order: Arc::new(PlaceOrderUseCase::new(
                Arc::clone(&store),
                Arc::clone(&event_publisher),
                placement,
            )),
            query_orders: Arc::new(OrderQueryUseCase::new(Arc::clone(&store), max_page_size)),
            transition_status: Arc::new(TransitionOrderStatusUseCase::new(
                Arc::clone(&store),
                Arc::clone(&event_publisher),
                lifecycle,
            )),
            delete_order: Arc::new(DeleteOrderUseCase::new(store, event_publisher)),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl<S, E> Clone for AppState<S, E>
where
    S: OrderStore + OrderRepository,
    E: EventPublisherPort,
{
    fn clone(&self) -> Self {
        Self {
            place_order: Arc::clone(&self.place_order),
            query_orders: Arc::clone(&self.query_orders),
            transition_status: Arc::clone(&self.transition_status),
            delete_order: Arc::clone(&self.delete_order),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<S, E>(state: AppState<S, E>) -> Router
where
    S: OrderStore + OrderRepository + 'static,
    E: EventPublisherPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/orders", post(place_order).get(list_orders))
        .route("/api/v1/orders/{id}", get(get_order))
        .route("/api/v1/orders/{id}/cancel", post(cancel_order))
        .route("/api/v1/admin/orders/{id}/status", put(transition_status))
        .route("/api/v1/admin/orders/{id}", delete(delete_order))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<S, E>(State(state): State<AppState<S, E>>) -> impl IntoResponse
where
    S: OrderStore + OrderRepository,
    E: EventPublisherPort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Place an order for the caller.
async fn place_order<S, E>(
    State(state): State<AppState<S, E>>,
    Identity(requester): Identity,
    payload: Result<Json<PlaceOrderRequestDto>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderDto>), ApiError>
where
    S: OrderStore + OrderRepository,
    E: EventPublisherPort,
{
    let Json(request) = payload.map_err(|e| ApiError::invalid_argument(e.body_text()))?;
    let order = state
        .place_order
        .execute(request.into_command(requester.user_id))
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List orders visible to the caller.
async fn list_orders<S, E>(
    State(state): State<AppState<S, E>>,
    Identity(requester): Identity,
    query: Result<Query<ListOrdersRequestDto>, QueryRejection>,
) -> Result<Json<OrderPageDto>, ApiError>
where
    S: OrderStore + OrderRepository,
    E: EventPublisherPort,
{
    let Query(request) = query.map_err(|e| ApiError::invalid_argument(e.body_text()))?;
    Ok(Json(state.query_orders.list(&requester, request).await?))
}

/// Fetch one order.
async fn get_order<S, E>(
    State(state): State<AppState<S, E>>,
    Identity(requester): Identity,
    Path(id): Path<String>,
) -> Result<Json<OrderDto>, ApiError>
where
    S: OrderStore + OrderRepository,
    E: EventPublisherPort,
{
    Ok(Json(
        state.query_orders.get(&requester, &OrderId::new(id)).await?,
    ))
}

/// Customer self-cancellation.
async fn cancel_order<S, E>(
    State(state): State<AppState<S, E>>,
    Identity(requester): Identity,
    Path(id): Path<String>,
) -> Result<Json<OrderDto>, ApiError>
where
    S: OrderStore + OrderRepository,
    E: EventPublisherPort,
{
    let order = state
        .transition_status
        .execute(&requester, &OrderId::new(id), OrderStatus::Cancelled)
        .await?;
    Ok(Json(order))
}

/// Admin status change.
async fn transition_status<S, E>(
    State(state): State<AppState<S, E>>,
    Identity(requester): Identity,
    Path(id): Path<String>,
    payload: Result<Json<TransitionStatusRequestDto>, JsonRejection>,
) -> Result<Json<OrderDto>, ApiError>
where
    S: OrderStore + OrderRepository,
    E: EventPublisherPort,
{
    if !requester.is_admin() {
        return Err(OrderError::Forbidden {
            action: "change order status".to_string(),
        }
        .into());
    }
    let Json(request) = payload.map_err(|e| ApiError::invalid_argument(e.body_text()))?;
    let order = state
        .transition_status
        .execute(&requester, &OrderId::new(id), request.status)
        .await?;
    Ok(Json(order))
}

/// Admin hard delete.
async fn delete_order<S, E>(
    State(state): State<AppState<S, E>>,
    Identity(requester): Identity,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    S: OrderStore + OrderRepository,
    E: EventPublisherPort,
{
    state
        .delete_order
        .execute(&requester, &OrderId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::NoOpEventPublisher;
    use crate::domain::catalog::{Product, ProductCatalog};
    use crate::domain::shared::{Money, ProductId};
    use crate::error::HttpErrorResponse;
    use crate::infrastructure::http::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
    use crate::infrastructure::persistence::InMemoryOrderStore;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    async fn router() -> Router {
        let store = Arc::new(InMemoryOrderStore::new());
        store
            .upsert_product(
                &Product::new(ProductId::new("p-1"), "Lamp", Money::new(dec!(100.00)), 5, None)
                    .unwrap(),
            )
            .await
            .unwrap();
        create_router(AppState::new(
            store,
            Arc::new(NoOpEventPublisher),
            PlacementSettings::default(),
            LifecycleSettings::default(),
            100,
        ))
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

    async fn json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health() {
        let response = router()
            .await
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn place_requires_identity() {
        let response = router()
            .await
            .oneshot(request(
                "POST",
                "/api/v1/orders",
                None,
                Some(r#"{"items":[{"product_id":"p-1","quantity":1}],"shipping_address":"x"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn place_returns_created_order() {
        let response = router()
            .await
            .oneshot(request(
                "POST",
                "/api/v1/orders",
                Some(("alice", "customer")),
                Some(r#"{"items":[{"product_id":"p-1","quantity":3}],"shipping_address":"12 Main St"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let order: OrderDto = json(response).await;
        assert_eq!(order.total, Money::new(dec!(300.00)));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn insufficient_stock_is_conflict() {
        let response = router()
            .await
            .oneshot(request(
                "POST",
                "/api/v1/orders",
                Some(("alice", "customer")),
                Some(r#"{"items":[{"product_id":"p-1","quantity":6}],"shipping_address":"12 Main St"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body: HttpErrorResponse = json(response).await;
        assert_eq!(body.code, "INSUFFICIENT_STOCK");
        assert_eq!(body.details["available"], "5");
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let response = router()
            .await
            .oneshot(request(
                "POST",
                "/api/v1/orders",
                Some(("alice", "customer")),
                Some("{not json"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn customer_cannot_use_admin_status_route() {
        let response = router()
            .await
            .oneshot(request(
                "PUT",
                "/api/v1/admin/orders/anything/status",
                Some(("alice", "customer")),
                Some(r#"{"status":"PAID"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let response = router()
            .await
            .oneshot(request(
                "GET",
                "/api/v1/orders/missing",
                Some(("root", "admin")),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

//! Place Order Use Case

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use super::publish_after_commit;
use crate::application::dto::OrderDto;
use crate::application::ports::EventPublisherPort;
use crate::application::retry::{TransactionRetryPolicy, with_transaction_retry};
use crate::domain::order_management::{
    Order, OrderBuilder, OrderError, OrderStore, PlaceOrderCommand, ValidatedPlacement,
};
use crate::observability::metrics;

/// Placement limits.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSettings {
    /// Upper bound on one placement, retries included.
    pub transaction_timeout: Duration,
    /// Maximum lines per order.
    pub max_line_items: usize,
    /// Retry policy for transient store failures.
    pub retry: TransactionRetryPolicy,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            transaction_timeout: Duration::from_millis(5000),
            max_line_items: 100,
            retry: TransactionRetryPolicy::default(),
        }
    }
}

/// Use case for placing an order.
///
/// Reservations, price snapshots, the order header and its line items are
/// written in one store transaction. Any failure before commit leaves stock
/// and orders exactly as they were.
pub struct PlaceOrderUseCase<S, E>
where
    S: OrderStore + ?Sized,
    E: EventPublisherPort + ?Sized,
{
    store: Arc<S>,
    event_publisher: Arc<E>,
    settings: PlacementSettings,
}

impl<S, E> PlaceOrderUseCase<S, E>
where
    S: OrderStore + ?Sized,
    E: EventPublisherPort + ?Sized,
{
    /// Create a new `PlaceOrderUseCase`.
    pub const fn new(store: Arc<S>, event_publisher: Arc<E>, settings: PlacementSettings) -> Self {
        Self {
            store,
            event_publisher,
            settings,
        }
    }

    /// Place an order for `command.user_id`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the command fails validation (nothing is written)
    /// - `ProductNotFound` / `InsufficientStock` if any line cannot be reserved
    /// - `Store` if the store fails, retries run out or the timeout expires
    #[instrument(
        name = "order.place",
        skip(self, command),
        fields(user_id = %command.user_id, lines = command.lines.len())
    )]
    pub async fn execute(&self, command: PlaceOrderCommand) -> Result<OrderDto, OrderError> {
        let started = Instant::now();
        let placement = command.validate(self.settings.max_line_items)?;

        let placement = &placement;
        let attempts = with_transaction_retry(&self.settings.retry, "place_order", move || {
            self.place_once(placement)
        });

        let outcome = match tokio::time::timeout(self.settings.transaction_timeout, attempts).await
        {
            Ok(result) => result.map_err(|e| (e.kind(), e)),
            Err(_) => Err((
                "timeout",
                OrderError::store(format!(
                    "order placement timed out after {}ms",
                    self.settings.transaction_timeout.as_millis()
                )),
            )),
        };
        let elapsed = started.elapsed().as_secs_f64();

        match outcome {
            Ok(mut order) => {
                metrics::record_order_placed(elapsed);
                info!(
                    order_id = %order.id(),
                    total = %order.total(),
                    "Order placed"
                );
                let dto = OrderDto::from_order(&order);
                publish_after_commit(self.event_publisher.as_ref(), order.drain_events()).await;
                Ok(dto)
            }
            Err((reason, err)) => {
                if matches!(err, OrderError::InsufficientStock { .. }) {
                    metrics::record_stock_rejection();
                }
                metrics::record_placement_failure(reason, elapsed);
                warn!(reason, error = %err, "Order placement failed");
                Err(err)
            }
        }
    }

    /// One attempt: a fresh transaction that either commits everything or
    /// is dropped (and rolled back) on the first error.
    async fn place_once(&self, placement: &ValidatedPlacement) -> Result<Order, OrderError> {
        let mut uow = self.store.begin().await?;
        let order = OrderBuilder::build(uow.as_mut(), placement).await?;
        uow.insert_order(&order).await?;
        uow.commit().await?;
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockEventPublisherPort, NoOpEventPublisher};
    use crate::domain::catalog::{Product, ProductCatalog};
    use crate::domain::order_management::{OrderEvent, OrderStatus, PaymentMethod, RequestedLine};
    use crate::domain::shared::{Money, ProductId, UserId};
    use crate::infrastructure::persistence::InMemoryOrderStore;
    use rust_decimal_macros::dec;

    async fn seeded_store() -> Arc<InMemoryOrderStore> {
        let store = Arc::new(InMemoryOrderStore::new());
        for (id, price, stock) in [("p-1", dec!(100.00), 5), ("p-2", dec!(50.00), 3)] {
            store
                .upsert_product(
                    &Product::new(ProductId::new(id), id, Money::new(price), stock, None).unwrap(),
                )
                .await
                .unwrap();
        }
        store
    }

    fn command(lines: Vec<RequestedLine>) -> PlaceOrderCommand {
        PlaceOrderCommand {
            user_id: UserId::new("alice"),
            lines,
            shipping_address: "12 Main St".to_string(),
            payment_method: PaymentMethod::Cod,
        }
    }

    async fn stock(store: &InMemoryOrderStore, id: &str) -> i64 {
        store
            .find_product(&ProductId::new(id))
            .await
            .unwrap()
            .unwrap()
            .available
            .value()
    }

    fn fast_retry() -> PlacementSettings {
        PlacementSettings {
            retry: TransactionRetryPolicy {
                initial_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(2),
                jitter_factor: 0.0,
                ..TransactionRetryPolicy::default()
            },
            ..PlacementSettings::default()
        }
    }

    #[tokio::test]
    async fn places_order_and_publishes_event() {
        let store = seeded_store().await;
        let mut publisher = MockEventPublisherPort::new();
        publisher
            .expect_publish_order_events()
            .withf(|events| matches!(events.as_slice(), [OrderEvent::Placed(_)]))
            .times(1)
            .returning(|_| Ok(()));
        let use_case =
            PlaceOrderUseCase::new(store.clone(), Arc::new(publisher), PlacementSettings::default());

        let dto = use_case
            .execute(command(vec![
                RequestedLine::new("p-1", 2),
                RequestedLine::new("p-2", 1),
            ]))
            .await
            .unwrap();

        assert_eq!(dto.status, OrderStatus::Pending);
        assert_eq!(dto.total, Money::new(dec!(250.00)));
        assert_eq!(dto.items.len(), 2);
        assert_eq!(dto.items[0].product_id, "p-1");
        assert_eq!(stock(&store, "p-1").await, 3);
        assert_eq!(stock(&store, "p-2").await, 2);
    }

    #[tokio::test]
    async fn insufficient_stock_leaves_everything_untouched() {
        let store = seeded_store().await;
        let use_case = PlaceOrderUseCase::new(
            store.clone(),
            Arc::new(NoOpEventPublisher),
            PlacementSettings::default(),
        );

        let err = use_case
            .execute(command(vec![
                RequestedLine::new("p-1", 2),
                RequestedLine::new("p-2", 4),
            ]))
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::InsufficientStock { available: 3, .. }));
        assert_eq!(stock(&store, "p-1").await, 5);
        assert_eq!(stock(&store, "p-2").await, 3);
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn line_total_overflow_is_rejected_and_rolled_back() {
        let store = seeded_store().await;
        let big = Product::new(
            ProductId::new("p-big"),
            "Big",
            Money::new(rust_decimal::Decimal::MAX),
            10,
            None,
        )
        .unwrap();
        store.upsert_product(&big).await.unwrap();
        let use_case = PlaceOrderUseCase::new(
            store.clone(),
            Arc::new(NoOpEventPublisher),
            PlacementSettings::default(),
        );

        let err = use_case
            .execute(command(vec![
                RequestedLine::new("p-1", 1),
                RequestedLine::new("p-big", 2),
            ]))
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::InvalidArgument { .. }));
        assert_eq!(stock(&store, "p-1").await, 5);
        assert_eq!(stock(&store, "p-big").await, 10);
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn invalid_quantity_is_rejected_before_the_store() {
        let store = seeded_store().await;
        store.fail_next_begins(10);
        let use_case = PlaceOrderUseCase::new(
            store.clone(),
            Arc::new(NoOpEventPublisher),
            PlacementSettings::default(),
        );

        let err = use_case
            .execute(command(vec![RequestedLine::new("p-1", 0)]))
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let store = seeded_store().await;
        store.fail_next_begins(2);
        let use_case =
            PlaceOrderUseCase::new(store.clone(), Arc::new(NoOpEventPublisher), fast_retry());

        let dto = use_case
            .execute(command(vec![RequestedLine::new("p-1", 1)]))
            .await
            .unwrap();

        assert_eq!(dto.total, Money::new(dec!(100.00)));
        assert_eq!(stock(&store, "p-1").await, 4);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_store_error() {
        let store = seeded_store().await;
        store.fail_next_begins(3);
        let use_case =
            PlaceOrderUseCase::new(store.clone(), Arc::new(NoOpEventPublisher), fast_retry());

        let err = use_case
            .execute(command(vec![RequestedLine::new("p-1", 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::Store { transient: false, .. }));
        assert_eq!(stock(&store, "p-1").await, 5);
    }

    #[tokio::test]
    async fn publish_failure_does_not_undo_placement() {
        let store = seeded_store().await;
        let mut publisher = MockEventPublisherPort::new();
        publisher.expect_publish_order_events().returning(|_| {
            Err(crate::application::ports::EventPublishError::PublishFailed {
                message: "publisher unavailable".to_string(),
            })
        });
        let use_case =
            PlaceOrderUseCase::new(store.clone(), Arc::new(publisher), PlacementSettings::default());

        assert!(use_case
            .execute(command(vec![RequestedLine::new("p-2", 3)]))
            .await
            .is_ok());
        assert_eq!(stock(&store, "p-2").await, 0);
        assert_eq!(store.order_count().await, 1);
    }
}

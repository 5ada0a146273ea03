//! Order Query Use Case

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::dto::{ListOrdersRequestDto, OrderDto, OrderPageDto};
use crate::domain::order_management::{OrderError, OrderListQuery, OrderRepository, Requester};
use crate::domain::shared::OrderId;

/// Page size used when the caller does not pass one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Read-side use case: list and fetch orders visible to a requester.
///
/// Customers only ever see their own orders; another user's order looks
/// exactly like a missing one.
pub struct OrderQueryUseCase<R>
where
    R: OrderRepository + ?Sized,
{
    order_repo: Arc<R>,
    max_page_size: u32,
}

impl<R> OrderQueryUseCase<R>
where
    R: OrderRepository + ?Sized,
{
    /// Create a new `OrderQueryUseCase`.
    pub const fn new(order_repo: Arc<R>, max_page_size: u32) -> Self {
        Self {
            order_repo,
            max_page_size,
        }
    }

    /// List orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for `page < 1` or a page size outside
    /// `1..=max_page_size`, `Store` if the read fails.
    #[instrument(name = "order.list", skip(self, request), fields(user_id = %requester.user_id))]
    pub async fn list(
        &self,
        requester: &Requester,
        request: ListOrdersRequestDto,
    ) -> Result<OrderPageDto, OrderError> {
        let page = request.page.unwrap_or(1);
        let page_size = request.limit.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 1 {
            return Err(OrderError::invalid("page", "must be at least 1"));
        }
        if page_size < 1 || page_size > self.max_page_size {
            return Err(OrderError::invalid(
                "limit",
                format!("must be between 1 and {}", self.max_page_size),
            ));
        }

        let query = OrderListQuery {
            owner: requester.visibility_scope().cloned(),
            status: request.status,
            page,
            page_size,
        };
        let result = self.order_repo.list(&query).await?;
        debug!(
            returned = result.orders.len(),
            total = result.total_count,
            "Orders listed"
        );
        Ok(OrderPageDto::from_page(&result, page, page_size))
    }

    /// Fetch one order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound` if the order does not exist or belongs to
    /// another user and the requester is not an admin.
    #[instrument(name = "order.get", skip(self), fields(user_id = %requester.user_id))]
    pub async fn get(&self, requester: &Requester, order_id: &OrderId) -> Result<OrderDto, OrderError> {
        self.order_repo
            .find_by_id(order_id)
            .await?
            .filter(|order| requester.can_see(order.user_id()))
            .map(|order| OrderDto::from_order(&order))
            .ok_or_else(|| OrderError::OrderNotFound {
                order_id: order_id.clone(),
            })
    }
}

//! SQLite persistence adapter.
//!
//! Implements every persistence port over one `sqlx` pool. Write units of
//! work open with `BEGIN IMMEDIATE`, so a transaction owns the database
//! write lock from its first statement and concurrent writers queue on the
//! busy timeout instead of failing a lock upgrade halfway through.
//!
//! The stock guard primitive is a conditional decrement checked by affected
//! row count:
//!
//! ```sql
//! UPDATE products SET available_quantity = available_quantity - ?
//!  WHERE id = ? AND available_quantity >= ?
//! ```

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePoolOptions, SqliteRow,
};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use super::schema::{CREATE_INDEXES, CREATE_ORDER_ITEMS, CREATE_ORDERS, CREATE_PRODUCTS};
use crate::domain::catalog::{CatalogError, Product, ProductCatalog};
use crate::domain::inventory::{InventoryError, InventoryLedger, ReserveOutcome};
use crate::domain::order_management::{
    LineItem, Order, OrderError, OrderListQuery, OrderPage, OrderRepository, OrderStatus,
    OrderStore, OrderUnitOfWork, PaymentMethod,
};
use crate::domain::order_management::aggregate::ReconstitutedOrderParams;
use crate::domain::shared::{
    LineItemId, Money, OrderId, ProductId, Quantity, StockLevel, Timestamp, UserId,
};

/// SQLite primary result codes that mean "try again".
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

const ORDER_COLUMNS: &str =
    "id, user_id, total, status, payment_method, shipping_address, created_at, updated_at";

/// Connection settings for [`SqliteOrderStore::connect`].
#[derive(Debug, Clone)]
pub struct SqliteSettings {
    /// `sqlite://path/to/file.db` or `sqlite::memory:`.
    pub database_url: String,
    /// Pool size.
    pub max_connections: u32,
    /// How long a statement waits on a locked database before failing busy.
    pub busy_timeout: Duration,
    /// How long to wait for a free pool connection.
    pub acquire_timeout: Duration,
}

impl Default for SqliteSettings {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 8,
            busy_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// A classified `sqlx` failure.
#[derive(Debug)]
struct StoreFailure {
    message: String,
    transient: bool,
}

impl From<sqlx::Error> for StoreFailure {
    fn from(err: sqlx::Error) -> Self {
        let transient = match &err {
            sqlx::Error::PoolTimedOut => true,
            sqlx::Error::Database(db) => db
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .is_some_and(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED)),
            _ => false,
        };
        Self {
            message: err.to_string(),
            transient,
        }
    }
}

impl From<StoreFailure> for OrderError {
    fn from(f: StoreFailure) -> Self {
        Self::Store {
            message: f.message,
            transient: f.transient,
        }
    }
}

impl From<StoreFailure> for InventoryError {
    fn from(f: StoreFailure) -> Self {
        Self::Store {
            message: f.message,
            transient: f.transient,
        }
    }
}

impl From<StoreFailure> for CatalogError {
    fn from(f: StoreFailure) -> Self {
        Self::Storage { message: f.message }
    }
}

/// SQLite implementation of the order, inventory and catalog ports.
#[derive(Debug, Clone)]
pub struct SqliteOrderStore {
    pool: SqlitePool,
}

impl SqliteOrderStore {
    /// Open a pool with WAL journaling and foreign keys on, then create the schema.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid, the database cannot be opened or
    /// the schema cannot be created.
    pub async fn connect(settings: &SqliteSettings) -> Result<Self, OrderError> {
        let options = SqliteConnectOptions::from_str(&settings.database_url)
            .map_err(StoreFailure::from)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(settings.busy_timeout)
            .foreign_keys(true);

        // Every connection to `:memory:` is its own database.
        let in_memory = settings.database_url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(settings.max_connections)
        };

        let pool = pool_options
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(StoreFailure::from)?;

        let store = Self::from_pool(pool);
        store.init().await?;
        info!(
            url = %settings.database_url,
            max_connections = settings.max_connections,
            busy_timeout_ms = settings.busy_timeout.as_millis() as u64,
            "SQLite order store ready"
        );
        Ok(store)
    }

    /// Wrap an existing pool. Call [`Self::init`] before use.
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if missing.
    ///
    /// # Errors
    ///
    /// Returns error if any DDL statement fails.
    pub async fn init(&self) -> Result<(), OrderError> {
        for ddl in [CREATE_PRODUCTS, CREATE_ORDERS, CREATE_ORDER_ITEMS]
            .into_iter()
            .chain(CREATE_INDEXES)
        {
            sqlx::query(ddl)
                .execute(&self.pool)
                .await
                .map_err(StoreFailure::from)?;
        }
        Ok(())
    }

    /// Underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn corrupt(entity: &str, id: &str, field: &str, message: impl std::fmt::Display) -> OrderError {
    OrderError::store(format!("corrupt {entity} row '{id}': {field}: {message}"))
}

fn header_from_row(row: &SqliteRow) -> Result<ReconstitutedOrderParams, OrderError> {
    let id: String = row.try_get("id").map_err(StoreFailure::from)?;
    let user_id: String = row.try_get("user_id").map_err(StoreFailure::from)?;
    let total: String = row.try_get("total").map_err(StoreFailure::from)?;
    let status: String = row.try_get("status").map_err(StoreFailure::from)?;
    let payment_method: String = row.try_get("payment_method").map_err(StoreFailure::from)?;
    let shipping_address: String = row.try_get("shipping_address").map_err(StoreFailure::from)?;
    let created_at: String = row.try_get("created_at").map_err(StoreFailure::from)?;
    let updated_at: String = row.try_get("updated_at").map_err(StoreFailure::from)?;

    Ok(ReconstitutedOrderParams {
        total: Money::parse(&total).map_err(|e| corrupt("order", &id, "total", e))?,
        status: OrderStatus::from_str(&status).map_err(|e| corrupt("order", &id, "status", e))?,
        payment_method: PaymentMethod::from_str(&payment_method)
            .map_err(|e| corrupt("order", &id, "payment_method", e))?,
        created_at: Timestamp::parse(&created_at)
            .map_err(|e| corrupt("order", &id, "created_at", e))?,
        updated_at: Timestamp::parse(&updated_at)
            .map_err(|e| corrupt("order", &id, "updated_at", e))?,
        id: OrderId::new(id),
        user_id: UserId::new(user_id),
        line_items: Vec::new(),
        shipping_address,
    })
}

fn line_item_from_row(row: &SqliteRow) -> Result<(String, LineItem), OrderError> {
    let id: String = row.try_get("id").map_err(StoreFailure::from)?;
    let order_id: String = row.try_get("order_id").map_err(StoreFailure::from)?;
    let product_id: String = row.try_get("product_id").map_err(StoreFailure::from)?;
    let quantity: i64 = row.try_get("quantity").map_err(StoreFailure::from)?;
    let unit_price: String = row.try_get("unit_price").map_err(StoreFailure::from)?;

    let quantity =
        Quantity::try_from_i64(quantity).map_err(|e| corrupt("order_item", &id, "quantity", e))?;
    let unit_price =
        Money::parse(&unit_price).map_err(|e| corrupt("order_item", &id, "unit_price", e))?;

    let item = LineItem::reconstitute(
        LineItemId::new(id.clone()),
        ProductId::new(product_id),
        quantity,
        unit_price,
    )
    .map_err(|e| corrupt("order_item", &id, "line_total", e))?;

    Ok((order_id, item))
}

fn assemble(mut params: ReconstitutedOrderParams, items: Vec<LineItem>) -> Order {
    params.line_items = items;
    let order = Order::reconstitute(params);
    if let Err(e) = order.verify_total() {
        warn!(order_id = %order.id(), error = %e, "Stored order total disagrees with its line items");
    }
    order
}

fn product_from_row(row: &SqliteRow) -> Result<Product, CatalogError> {
    let id: String = row.try_get("id").map_err(StoreFailure::from)?;
    let name: String = row.try_get("name").map_err(StoreFailure::from)?;
    let price: String = row.try_get("price").map_err(StoreFailure::from)?;
    let available: i64 = row.try_get("available_quantity").map_err(StoreFailure::from)?;
    let category_id: Option<String> = row.try_get("category_id").map_err(StoreFailure::from)?;

    let corrupt = |e: crate::domain::shared::DomainError| CatalogError::Corrupt {
        product_id: id.clone(),
        message: e.to_string(),
    };
    let price = Money::parse(&price).map_err(corrupt)?;
    Product::new(ProductId::new(id.clone()), name, price, available, category_id).map_err(corrupt)
}

// ============================================================================
// Shared queries (run on a pool connection or inside a transaction)
// ============================================================================

async fn fetch_line_items(
    conn: &mut SqliteConnection,
    order_ids: &[String],
) -> Result<HashMap<String, Vec<LineItem>>, OrderError> {
    let mut items: HashMap<String, Vec<LineItem>> = HashMap::new();
    if order_ids.is_empty() {
        return Ok(items);
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT id, order_id, product_id, quantity, unit_price FROM order_items WHERE order_id IN (",
    );
    let mut ids = qb.separated(", ");
    for id in order_ids {
        ids.push_bind(id.clone());
    }
    ids.push_unseparated(") ORDER BY order_id, position");

    let rows = qb
        .build()
        .fetch_all(&mut *conn)
        .await
        .map_err(StoreFailure::from)?;
    for row in &rows {
        let (order_id, item) = line_item_from_row(row)?;
        items.entry(order_id).or_default().push(item);
    }
    Ok(items)
}

async fn fetch_order(conn: &mut SqliteConnection, id: &OrderId) -> Result<Option<Order>, OrderError> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
    let Some(row) = sqlx::query(&sql)
        .bind(id.as_str())
        .fetch_optional(&mut *conn)
        .await
        .map_err(StoreFailure::from)?
    else {
        return Ok(None);
    };

    let params = header_from_row(&row)?;
    let mut items = fetch_line_items(conn, &[id.to_string()]).await?;
    let lines = items.remove(id.as_str()).unwrap_or_default();
    Ok(Some(assemble(params, lines)))
}

// ============================================================================
// OrderStore
// ============================================================================

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn begin(&self) -> Result<Box<dyn OrderUnitOfWork>, OrderError> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(StoreFailure::from)?;
        Ok(Box::new(SqliteUnitOfWork { tx }))
    }
}

/// One `BEGIN IMMEDIATE` transaction. Rolled back on drop unless committed.
struct SqliteUnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl InventoryLedger for SqliteUnitOfWork {
    async fn try_reserve(
        &mut self,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<ReserveOutcome, InventoryError> {
        let result = sqlx::query(
            "UPDATE products SET available_quantity = available_quantity - ? \
             WHERE id = ? AND available_quantity >= ?",
        )
        .bind(quantity.as_i64())
        .bind(product_id.as_str())
        .bind(quantity.as_i64())
        .execute(&mut *self.tx)
        .await
        .map_err(StoreFailure::from)?;

        if result.rows_affected() == 1 {
            return Ok(ReserveOutcome::Reserved);
        }

        let available: Option<i64> =
            sqlx::query_scalar("SELECT available_quantity FROM products WHERE id = ?")
                .bind(product_id.as_str())
                .fetch_optional(&mut *self.tx)
                .await
                .map_err(StoreFailure::from)?;

        match available {
            None => Ok(ReserveOutcome::UnknownProduct),
            Some(units) => {
                debug!(product_id = %product_id, requested = %quantity, available = units, "Stock guard rejected reservation");
                let available = StockLevel::new(units).map_err(|e| InventoryError::Store {
                    message: format!("corrupt stock for product '{product_id}': {e}"),
                    transient: false,
                })?;
                Ok(ReserveOutcome::Insufficient { available })
            }
        }
    }

    async fn current_price(
        &mut self,
        product_id: &ProductId,
    ) -> Result<Option<Money>, InventoryError> {
        let price: Option<String> = sqlx::query_scalar("SELECT price FROM products WHERE id = ?")
            .bind(product_id.as_str())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(StoreFailure::from)?;

        price
            .map(|p| {
                Money::parse(&p).map_err(|e| InventoryError::Store {
                    message: format!("corrupt price for product '{product_id}': {e}"),
                    transient: false,
                })
            })
            .transpose()
    }

    async fn restock(
        &mut self,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<(), InventoryError> {
        sqlx::query("UPDATE products SET available_quantity = available_quantity + ? WHERE id = ?")
            .bind(quantity.as_i64())
            .bind(product_id.as_str())
            .execute(&mut *self.tx)
            .await
            .map_err(StoreFailure::from)?;
        Ok(())
    }
}

#[async_trait]
impl OrderUnitOfWork for SqliteUnitOfWork {
    async fn load_order(&mut self, id: &OrderId) -> Result<Option<Order>, OrderError> {
        fetch_order(&mut self.tx, id).await
    }

    async fn insert_order(&mut self, order: &Order) -> Result<(), OrderError> {
        sqlx::query(
            "INSERT INTO orders (id, user_id, total, status, payment_method, shipping_address, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(order.id().as_str())
        .bind(order.user_id().as_str())
        .bind(order.total().to_storage())
        .bind(order.status().as_str())
        .bind(order.payment_method().as_str())
        .bind(order.shipping_address())
        .bind(order.created_at().to_storage())
        .bind(order.updated_at().to_storage())
        .execute(&mut *self.tx)
        .await
        .map_err(StoreFailure::from)?;

        for (position, item) in order.line_items().iter().enumerate() {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, position, quantity, unit_price) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(item.id().as_str())
            .bind(order.id().as_str())
            .bind(item.product_id().as_str())
            .bind(position as i64)
            .bind(item.quantity().as_i64())
            .bind(item.unit_price().to_storage())
            .execute(&mut *self.tx)
            .await
            .map_err(StoreFailure::from)?;
        }
        Ok(())
    }

    async fn compare_and_set_status(
        &mut self,
        order: &Order,
        expected: OrderStatus,
    ) -> Result<bool, OrderError> {
        let result =
            sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
                .bind(order.status().as_str())
                .bind(order.updated_at().to_storage())
                .bind(order.id().as_str())
                .bind(expected.as_str())
                .execute(&mut *self.tx)
                .await
                .map_err(StoreFailure::from)?;
        Ok(result.rows_affected() == 1)
    }

    async fn commit(self: Box<Self>) -> Result<(), OrderError> {
        self.tx.commit().await.map_err(StoreFailure::from)?;
        Ok(())
    }
}

// ============================================================================
// OrderRepository
// ============================================================================

#[async_trait]
impl OrderRepository for SqliteOrderStore {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderError> {
        let mut tx = self.pool.begin().await.map_err(StoreFailure::from)?;
        let order = fetch_order(&mut tx, id).await?;
        tx.commit().await.map_err(StoreFailure::from)?;
        Ok(order)
    }

    async fn list(&self, query: &OrderListQuery) -> Result<OrderPage, OrderError> {
        // One read transaction so the count, the page and its items share a snapshot.
        let mut tx = self.pool.begin().await.map_err(StoreFailure::from)?;

        let push_filters = |qb: &mut QueryBuilder<'_, Sqlite>| {
            qb.push(" WHERE 1 = 1");
            if let Some(owner) = &query.owner {
                qb.push(" AND user_id = ").push_bind(owner.to_string());
            }
            if let Some(status) = query.status {
                qb.push(" AND status = ").push_bind(status.as_str());
            }
        };

        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM orders");
        push_filters(&mut count_qb);
        let total_count: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&mut *tx)
            .await
            .map_err(StoreFailure::from)?;

        let mut page_qb = QueryBuilder::<Sqlite>::new(format!("SELECT {ORDER_COLUMNS} FROM orders"));
        push_filters(&mut page_qb);
        page_qb
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(query.page_size))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.offset()).unwrap_or(i64::MAX));
        let rows = page_qb
            .build()
            .fetch_all(&mut *tx)
            .await
            .map_err(StoreFailure::from)?;

        let headers = rows
            .iter()
            .map(header_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        let ids: Vec<String> = headers.iter().map(|h| h.id.to_string()).collect();
        let mut items = fetch_line_items(&mut tx, &ids).await?;
        tx.commit().await.map_err(StoreFailure::from)?;

        let orders = headers
            .into_iter()
            .map(|h| {
                let lines = items.remove(h.id.as_str()).unwrap_or_default();
                assemble(h, lines)
            })
            .collect();

        Ok(OrderPage {
            orders,
            total_count: u64::try_from(total_count).unwrap_or(0),
        })
    }

    async fn delete(&self, id: &OrderId) -> Result<bool, OrderError> {
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(StoreFailure::from)?;
        sqlx::query("DELETE FROM order_items WHERE order_id = ?")
            .bind(id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(StoreFailure::from)?;
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(StoreFailure::from)?;
        tx.commit().await.map_err(StoreFailure::from)?;
        Ok(result.rows_affected() == 1)
    }
}

// ============================================================================
// ProductCatalog
// ============================================================================

#[async_trait]
impl ProductCatalog for SqliteOrderStore {
    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let row = sqlx::query(
            "SELECT id, name, price, available_quantity, category_id FROM products WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreFailure::from)?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn upsert_product(&self, product: &Product) -> Result<(), CatalogError> {
        sqlx::query(
            "INSERT INTO products (id, name, price, available_quantity, category_id) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, price = excluded.price, \
             available_quantity = excluded.available_quantity, category_id = excluded.category_id",
        )
        .bind(product.id.as_str())
        .bind(&product.name)
        .bind(product.price.to_storage())
        .bind(product.available.value())
        .bind(product.category_id.as_deref())
        .execute(&self.pool)
        .await
        .map_err(StoreFailure::from)?;
        Ok(())
    }

    async fn set_price(&self, id: &ProductId, price: Money) -> Result<bool, CatalogError> {
        let result = sqlx::query("UPDATE products SET price = ? WHERE id = ?")
            .bind(price.to_storage())
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StoreFailure::from)?;
        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_management::{OrderBuilder, PlaceOrderCommand, RequestedLine};
    use rust_decimal_macros::dec;

    async fn memory_store() -> SqliteOrderStore {
        let store = SqliteOrderStore::connect(&SqliteSettings::default())
            .await
            .unwrap();
        store
            .upsert_product(
                &Product::new(
                    ProductId::new("p-1"),
                    "Lamp",
                    Money::new(dec!(100.00)),
                    5,
                    Some("c-1".to_string()),
                )
                .unwrap(),
            )
            .await
            .unwrap();
        store
    }

    async fn stock(store: &SqliteOrderStore, id: &str) -> i64 {
        store
            .find_product(&ProductId::new(id))
            .await
            .unwrap()
            .unwrap()
            .available
            .value()
    }

    fn placement(lines: Vec<RequestedLine>) -> crate::domain::order_management::ValidatedPlacement {
        PlaceOrderCommand {
            user_id: UserId::new("alice"),
            lines,
            shipping_address: "12 Main St".to_string(),
            payment_method: PaymentMethod::Momo,
        }
        .validate(100)
        .unwrap()
    }

    #[test]
    fn busy_and_locked_codes_are_transient() {
        assert_eq!(SQLITE_BUSY & 0xff, 5);
        assert_eq!((517 & 0xff), SQLITE_BUSY);
        assert_eq!((262 & 0xff), SQLITE_LOCKED);
        let failure = StoreFailure::from(sqlx::Error::PoolTimedOut);
        assert!(failure.transient);
        let failure = StoreFailure::from(sqlx::Error::RowNotFound);
        assert!(!failure.transient);
    }

    #[tokio::test]
    async fn conditional_decrement_and_rejection() {
        let store = memory_store().await;
        let mut uow = store.begin().await.unwrap();

        let first = uow
            .try_reserve(&ProductId::new("p-1"), Quantity::new(3).unwrap())
            .await
            .unwrap();
        let second = uow
            .try_reserve(&ProductId::new("p-1"), Quantity::new(3).unwrap())
            .await
            .unwrap();
        let missing = uow
            .try_reserve(&ProductId::new("nope"), Quantity::new(1).unwrap())
            .await
            .unwrap();
        uow.commit().await.unwrap();

        assert_eq!(first, ReserveOutcome::Reserved);
        assert_eq!(
            second,
            ReserveOutcome::Insufficient {
                available: StockLevel::new(2).unwrap()
            }
        );
        assert_eq!(missing, ReserveOutcome::UnknownProduct);
        assert_eq!(stock(&store, "p-1").await, 2);
    }

    #[tokio::test]
    async fn order_roundtrip_preserves_prices_order_and_timestamps() {
        let store = memory_store().await;
        store
            .upsert_product(
                &Product::new(ProductId::new("p-0"), "Pen", Money::new(dec!(0.10)), 50, None)
                    .unwrap(),
            )
            .await
            .unwrap();

        let mut uow = store.begin().await.unwrap();
        let order = OrderBuilder::build(
            uow.as_mut(),
            &placement(vec![RequestedLine::new("p-1", 1), RequestedLine::new("p-0", 3)]),
        )
        .await
        .unwrap();
        uow.insert_order(&order).await.unwrap();
        uow.commit().await.unwrap();

        let loaded = store.find_by_id(order.id()).await.unwrap().unwrap();
        assert_eq!(loaded.total(), Money::new(dec!(100.30)));
        assert_eq!(loaded.total().to_storage(), order.total().to_storage());
        assert_eq!(loaded.line_items(), order.line_items());
        assert_eq!(loaded.created_at(), order.created_at());
        assert_eq!(loaded.payment_method(), PaymentMethod::Momo);
        assert_eq!(stock(&store, "p-0").await, 47);
    }

    #[tokio::test]
    async fn dropped_unit_of_work_rolls_back() {
        let store = memory_store().await;
        {
            let mut uow = store.begin().await.unwrap();
            let order = OrderBuilder::build(uow.as_mut(), &placement(vec![RequestedLine::new("p-1", 2)]))
                .await
                .unwrap();
            uow.insert_order(&order).await.unwrap();
        }

        assert_eq!(stock(&store, "p-1").await, 5);
        let page = store
            .list(&OrderListQuery {
                owner: None,
                status: None,
                page: 1,
                page_size: 10,
            })
            .await
            .unwrap();
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn compare_and_set_status_detects_stale_expectation() {
        let store = memory_store().await;
        let mut uow = store.begin().await.unwrap();
        let order = OrderBuilder::build(uow.as_mut(), &placement(vec![RequestedLine::new("p-1", 1)]))
            .await
            .unwrap();
        uow.insert_order(&order).await.unwrap();

        assert!(!uow.compare_and_set_status(&order, OrderStatus::Paid).await.unwrap());
        assert!(uow.compare_and_set_status(&order, OrderStatus::Pending).await.unwrap());
        uow.commit().await.unwrap();
    }

    #[tokio::test]
    async fn set_price_and_delete() {
        let store = memory_store().await;
        assert!(store.set_price(&ProductId::new("p-1"), Money::new(dec!(150.00))).await.unwrap());
        assert!(!store.set_price(&ProductId::new("p-x"), Money::ZERO).await.unwrap());
        assert!(!store.delete(&OrderId::new("missing")).await.unwrap());
    }
}

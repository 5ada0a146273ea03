//! SQLite schema.
//!
//! Money columns are decimal TEXT and timestamps are fixed-width RFC 3339
//! TEXT, so both round-trip exactly and timestamps sort lexically.

/// Products: the catalog slice the engine reads and the stock it guards.
pub const CREATE_PRODUCTS: &str = r"
CREATE TABLE IF NOT EXISTS products (
    id                 TEXT PRIMARY KEY,
    name               TEXT NOT NULL,
    price              TEXT NOT NULL,
    available_quantity INTEGER NOT NULL CHECK (available_quantity >= 0),
    category_id        TEXT
)";

/// Order headers.
pub const CREATE_ORDERS: &str = r"
CREATE TABLE IF NOT EXISTS orders (
    id               TEXT PRIMARY KEY,
    user_id          TEXT NOT NULL,
    total            TEXT NOT NULL,
    status           TEXT NOT NULL
                     CHECK (status IN ('PENDING', 'PAID', 'SHIPPED', 'DELIVERED', 'CANCELLED')),
    payment_method   TEXT NOT NULL,
    shipping_address TEXT NOT NULL,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
)";

/// Line items. `position` keeps request order.
pub const CREATE_ORDER_ITEMS: &str = r"
CREATE TABLE IF NOT EXISTS order_items (
    id         TEXT PRIMARY KEY,
    order_id   TEXT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    product_id TEXT NOT NULL REFERENCES products(id),
    position   INTEGER NOT NULL,
    quantity   INTEGER NOT NULL CHECK (quantity > 0),
    unit_price TEXT NOT NULL,
    UNIQUE (order_id, position)
)";

/// Secondary indexes for list queries.
pub const CREATE_INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS idx_orders_created ON orders (created_at DESC, id DESC)",
    "CREATE INDEX IF NOT EXISTS idx_orders_user_created ON orders (user_id, created_at DESC, id DESC)",
    "CREATE INDEX IF NOT EXISTS idx_orders_status_created ON orders (status, created_at DESC, id DESC)",
];

use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::SqliteConnection;

use super::products;
use crate::{
    db_types::{NewOrder, NewOrderItem, Order, OrderItem},
    traits::{BillingError, PricedItem},
};

/// Inserts a new order and its items using the given connection. This is not atomic. Embed this call inside a
/// transaction and pass `&mut *tx` as the connection argument if the order and items must be stored together.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, BillingError> {
    let record: Order = sqlx::query_as("INSERT INTO orders (status, created_at) VALUES ('created', $1) RETURNING *;")
        .bind(order.created_at)
        .fetch_one(&mut *conn)
        .await?;
    for item in order.items {
        insert_item(record.id, item, conn).await?;
    }
    debug!("🗃️ Order #{} inserted", record.id);
    Ok(record)
}

/// Adds a line item to an order. The product must exist.
pub async fn insert_item(
    order_id: i64,
    item: NewOrderItem,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, BillingError> {
    if products::fetch_product(item.product_id, conn).await?.is_none() {
        return Err(BillingError::ProductNotFound(item.product_id));
    }
    let item: OrderItem = sqlx::query_as(
        r#"
            INSERT INTO order_items (order_id, product_id, quantity) VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .fetch_one(conn)
    .await?;
    trace!("🗃️ Item #{} (product #{} × {}) added to order #{order_id}", item.id, item.product_id, item.quantity);
    Ok(item)
}

pub async fn fetch_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, BillingError> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, BillingError> {
    let orders = sqlx::query_as("SELECT * FROM orders ORDER BY id").fetch_all(conn).await?;
    Ok(orders)
}

/// Fetches the order's items in insertion order, joined with their products. The join is a LEFT JOIN so that a
/// dangling product reference shows up as a `NULL` cost rather than a silently missing line.
pub async fn fetch_priced_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<PricedItem>, BillingError> {
    let items = sqlx::query_as(
        r#"
            SELECT
                order_items.id,
                order_items.order_id,
                order_items.product_id,
                order_items.quantity,
                products.name AS product_name,
                products.cost AS unit_cost
            FROM order_items LEFT JOIN products ON products.id = order_items.product_id
            WHERE order_items.order_id = $1
            ORDER BY order_items.id;
        "#,
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(items)
}

/// Deletes the order. Its items and payments go with it via `ON DELETE CASCADE`.
pub async fn delete_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, BillingError> {
    let order = sqlx::query_as("DELETE FROM orders WHERE id = $1 RETURNING *").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

/// Compare-and-swap from `created` to `confirmed`, guarded by the existence of a payment with status `paid_status`.
///
/// Returns the updated order if this call made the transition, or `None` if the guard did not hold (the order is
/// missing, not in `created`, or has no qualifying payment).
pub async fn confirm_order(
    id: i64,
    paid_status: &str,
    confirmed_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, BillingError> {
    let order = sqlx::query_as(
        r#"
            UPDATE orders SET status = 'confirmed', confirmed_at = $1
            WHERE id = $2 AND status = 'created' AND EXISTS (
                SELECT 1 FROM payments WHERE payments.order_id = orders.id AND payments.status = $3
            )
            RETURNING *;
        "#,
    )
    .bind(confirmed_at)
    .bind(id)
    .bind(paid_status)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// Moves a confirmed order to `completed`. Returns `None` if the order is not currently confirmed.
pub async fn complete_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, BillingError> {
    let order =
        sqlx::query_as("UPDATE orders SET status = 'completed' WHERE id = $1 AND status = 'confirmed' RETURNING *")
            .bind(id)
            .fetch_optional(conn)
            .await?;
    Ok(order)
}

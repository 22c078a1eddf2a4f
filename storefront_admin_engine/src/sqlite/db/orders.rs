use log::trace;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{db_types::Order, order_objects::StatusBucket, traits::StoreApiError};

/// Appends the bucket's WHERE clause. The two buckets deliberately do not cover orders that are exactly one of
/// {paid, fulfilled}; such orders are invisible to both list views.
fn push_bucket_filter(builder: &mut QueryBuilder<'_, Sqlite>, bucket: StatusBucket) {
    match bucket {
        StatusBucket::Pending => {
            builder.push(" WHERE financial_status <> 'paid' AND fulfillment_status <> 'fulfilled'")
        },
        StatusBucket::Completed => {
            builder.push(" WHERE financial_status = 'paid' AND fulfillment_status = 'fulfilled'")
        },
    };
}

/// Returns the order with the given internal id, if it exists.
pub async fn fetch_order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, StoreApiError> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

/// Fetches up to `limit` orders in the given bucket.
///
/// Resulting orders are ordered by the internal id in descending order (newest first).
pub async fn fetch_orders_in_bucket(
    bucket: StatusBucket,
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, StoreApiError> {
    let mut builder = QueryBuilder::new("SELECT * FROM orders");
    push_bucket_filter(&mut builder, bucket);
    builder.push(" ORDER BY id DESC LIMIT ");
    builder.push_bind(limit);
    trace!("🗃️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    trace!("🗃️ Result of fetch_orders_in_bucket: {:?}", orders.len());
    Ok(orders)
}

/// Counts all orders in the given bucket, ignoring the page limit.
pub async fn count_orders_in_bucket(bucket: StatusBucket, conn: &mut SqliteConnection) -> Result<i64, StoreApiError> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM orders");
    push_bucket_filter(&mut builder, bucket);
    let count = builder.build_query_scalar::<i64>().fetch_one(conn).await?;
    Ok(count)
}

/// Stamps the order paid and fulfilled and touches `updated_at`, regardless of the order's prior state. Returns
/// `None` when the id matches nothing; completion of a missing order is not an error at this layer.
pub async fn mark_order_complete(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, StoreApiError> {
    let order: Option<Order> = sqlx::query_as(
        "UPDATE orders SET financial_status = 'paid', fulfillment_status = 'fulfilled', updated_at = \
         CURRENT_TIMESTAMP WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    trace!("🗃️ Result of mark_order_complete: {order:?}");
    Ok(order)
}

//! Unifies API for the admin order flows.

use std::fmt::Debug;

use log::*;

use crate::{
    api::errors::OrderAdminApiError,
    assembler::assemble_order_view,
    db_types::{Order, User},
    order_objects::{MissingUserPolicy, OrderList, OrderView, StatusBucket},
    traits::{AdminBackend, CatalogManagement, OrderManagement, UserManagement},
};

/// The number of orders a list view fetches. There is no further pagination; the displayed bucket count may exceed
/// one page.
pub const ORDER_PAGE_SIZE: i64 = 35;

/// The `OrderAdminApi` provides a unified API for the admin dashboard flows: bucketed list views, single-order
/// views for the new-order alert, and order completion.
pub struct OrderAdminApi<B> {
    db: B,
}

impl<B: Debug> Debug for OrderAdminApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderAdminApi ({:?})", self.db)
    }
}

impl<B> OrderAdminApi<B>
where B: AdminBackend
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches a user record. The HTTP layer uses this for its admin authorization gate.
    pub async fn fetch_user(&self, id: i64) -> Result<Option<User>, OrderAdminApiError> {
        Ok(self.db.fetch_user_by_id(id).await?)
    }

    /// Fetches one page of assembled order views for the given bucket, newest first, along with the total bucket
    /// count.
    ///
    /// Product and purchaser records are resolved per order. A missing product is always a hard
    /// [`AssemblyError`](crate::assembler::AssemblyError); a missing purchaser is handled according to `policy`.
    pub async fn order_list(
        &self,
        bucket: StatusBucket,
        policy: MissingUserPolicy,
    ) -> Result<OrderList, OrderAdminApiError> {
        let orders = self.db.fetch_orders_in_bucket(bucket, ORDER_PAGE_SIZE).await?;
        let count = self.db.count_orders_in_bucket(bucket).await?;
        trace!("🛒️ Fetched {} of {count} {bucket} orders", orders.len());
        let mut views = Vec::with_capacity(orders.len());
        for order in &orders {
            let user = match (self.db.fetch_user_by_id(order.user_id).await?, policy) {
                (Some(user), _) => user,
                (None, MissingUserPolicy::Skip) => {
                    debug!(
                        "🛒️ Order {} references user {}, which does not exist. Dropping the order from the list.",
                        order.id, order.user_id
                    );
                    continue;
                },
                (None, MissingUserPolicy::Reject) => return Err(OrderAdminApiError::UserNotFound(order.user_id)),
            };
            let products = self.db.fetch_products_by_ids(&order.product_ids()).await?;
            views.push(assemble_order_view(order, &products, &user)?);
        }
        Ok(OrderList { orders: views, count, bucket })
    }

    /// Fetches and assembles a single order view. Unlike the list flow, every reference must resolve: a missing
    /// order is [`OrderNotFound`](OrderAdminApiError::OrderNotFound) and a missing purchaser is
    /// [`UserNotFound`](OrderAdminApiError::UserNotFound).
    pub async fn order_view(&self, order_id: i64) -> Result<OrderView, OrderAdminApiError> {
        let order =
            self.db.fetch_order_by_id(order_id).await?.ok_or(OrderAdminApiError::OrderNotFound(order_id))?;
        let user = self
            .db
            .fetch_user_by_id(order.user_id)
            .await?
            .ok_or(OrderAdminApiError::UserNotFound(order.user_id))?;
        let products = self.db.fetch_products_by_ids(&order.product_ids()).await?;
        let view = assemble_order_view(&order, &products, &user)?;
        Ok(view)
    }

    /// Marks an order paid and fulfilled, regardless of its prior state. Applying this twice leaves the statuses
    /// identical; only `updated_at` moves. Returns `None` when no order with that id exists.
    pub async fn complete_order(&self, order_id: i64) -> Result<Option<Order>, OrderAdminApiError> {
        let order = self.db.mark_order_complete(order_id).await?;
        match &order {
            Some(order) => info!("🛒️ Order {} (#{}) marked as complete", order.id, order.order_number),
            None => warn!("🛒️ Completion requested for order {order_id}, which does not exist. Nothing was updated."),
        }
        Ok(order)
    }
}

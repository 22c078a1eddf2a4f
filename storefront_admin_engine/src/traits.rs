//! Storage trait seams for the admin gateway.
//!
//! The three record collections (orders, products, users) evolve independently and are owned by the wider
//! storefront; this module defines the read/write surface the admin gateway needs from each of them. The SQLite
//! backend implements all three, and the endpoint tests swap in mocks.

use thiserror::Error;

use crate::{
    db_types::{Order, Product, ProductId, User},
    order_objects::StatusBucket,
};

#[derive(Debug, Clone, Error)]
pub enum StoreApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User error constructing query: {0}")]
    QueryError(String),
}

impl From<sqlx::Error> for StoreApiError {
    fn from(e: sqlx::Error) -> Self {
        StoreApiError::DatabaseError(e.to_string())
    }
}

/// The `OrderManagement` trait defines read and completion access to the order collection.
///
/// List reads are bucketed: the pending bucket holds orders that are neither paid nor fulfilled, the completed
/// bucket holds orders that are both. An order that is exactly one of {paid, fulfilled} belongs to neither bucket
/// and is invisible to list views.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Fetches a single order by its internal id. If no order exists, `None` is returned.
    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, StoreApiError>;

    /// Fetches up to `limit` orders in the given bucket, newest first by internal id.
    async fn fetch_orders_in_bucket(&self, bucket: StatusBucket, limit: i64) -> Result<Vec<Order>, StoreApiError>;

    /// Counts every order in the given bucket, ignoring the list page limit.
    async fn count_orders_in_bucket(&self, bucket: StatusBucket) -> Result<i64, StoreApiError>;

    /// Unconditionally marks the order paid and fulfilled and touches `updated_at`. Returns the updated order, or
    /// `None` when no order with that id exists (the caller decides whether that is an error).
    async fn mark_order_complete(&self, id: i64) -> Result<Option<Order>, StoreApiError>;
}

/// Read access to the product catalog, which is owned by the storefront proper.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Fetches the products with the given ids. Ids with no matching product are simply absent from the result;
    /// the assembler is the one that decides a missing product is a data-integrity fault.
    async fn fetch_products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreApiError>;
}

/// Read access to user records, which are owned by the authentication system.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, StoreApiError>;
}

/// Everything the admin gateway needs from a storage backend, as one bound.
pub trait AdminBackend: OrderManagement + CatalogManagement + UserManagement {}

impl<T> AdminBackend for T where T: OrderManagement + CatalogManagement + UserManagement {}

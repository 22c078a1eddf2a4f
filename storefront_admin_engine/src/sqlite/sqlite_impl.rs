//! `SqliteDatabase` is a concrete implementation of a storefront admin backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`traits`] module.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{new_pool, orders, products, users};
use crate::{
    db_types::{Order, Product, ProductId, User},
    order_objects::StatusBucket,
    traits::{CatalogManagement, OrderManagement, StoreApiError, UserManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connects to the database at `url` and brings the schema up to date. The pool is cheap to clone and is the
    /// one shared, read-mostly handle the rest of the system receives.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, StoreApiError> {
        let pool = new_pool(url, max_connections).await?;
        sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| StoreApiError::DatabaseError(e.to_string()))?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the connection pool. Call this on shutdown; any subsequent use of the database is an error.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_id(id, &mut conn).await
    }

    async fn fetch_orders_in_bucket(&self, bucket: StatusBucket, limit: i64) -> Result<Vec<Order>, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_in_bucket(bucket, limit, &mut conn).await
    }

    async fn count_orders_in_bucket(&self, bucket: StatusBucket) -> Result<i64, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::count_orders_in_bucket(bucket, &mut conn).await
    }

    async fn mark_order_complete(&self, id: i64) -> Result<Option<Order>, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::mark_order_complete(id, &mut conn).await
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_products_by_ids(ids, &mut conn).await
    }
}

impl UserManagement for SqliteDatabase {
    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_id(id, &mut conn).await
    }
}

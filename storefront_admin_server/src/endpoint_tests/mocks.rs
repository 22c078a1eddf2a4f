use mockall::mock;
use storefront_admin_engine::{
    db_types::{Order, Product, ProductId, User},
    order_objects::StatusBucket,
    traits::{CatalogManagement, OrderManagement, StoreApiError, UserManagement},
};

mock! {
    pub AdminStore {}
    impl OrderManagement for AdminStore {
        async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, StoreApiError>;
        async fn fetch_orders_in_bucket(&self, bucket: StatusBucket, limit: i64) -> Result<Vec<Order>, StoreApiError>;
        async fn count_orders_in_bucket(&self, bucket: StatusBucket) -> Result<i64, StoreApiError>;
        async fn mark_order_complete(&self, id: i64) -> Result<Option<Order>, StoreApiError>;
    }
    impl CatalogManagement for AdminStore {
        async fn fetch_products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreApiError>;
    }
    impl UserManagement for AdminStore {
        async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, StoreApiError>;
    }
}

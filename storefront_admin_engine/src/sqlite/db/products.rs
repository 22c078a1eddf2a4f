use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{Product, ProductId},
    traits::StoreApiError,
};

/// Fetches the catalog products with the given ids. Ids that match nothing are absent from the result set.
pub async fn fetch_products_by_ids(
    ids: &[ProductId],
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, StoreApiError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new("SELECT * FROM products WHERE id IN (");
    let mut values = builder.separated(", ");
    for id in ids {
        values.push_bind(id.as_str());
    }
    builder.push(")");
    let products = builder.build_query_as::<Product>().fetch_all(conn).await?;
    Ok(products)
}

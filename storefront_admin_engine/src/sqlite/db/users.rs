use sqlx::SqliteConnection;

use crate::{db_types::User, traits::StoreApiError};

/// Returns the user with the given id, if the record still exists.
pub async fn fetch_user_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, StoreApiError> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(user)
}

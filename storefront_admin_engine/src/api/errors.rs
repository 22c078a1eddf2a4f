use thiserror::Error;

use crate::{assembler::AssemblyError, traits::StoreApiError};

#[derive(Debug, Clone, Error)]
pub enum OrderAdminApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User error constructing query: {0}")]
    QueryError(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(i64),
    #[error("User {0} does not exist")]
    UserNotFound(i64),
    #[error("Could not assemble the order view. {0}")]
    AssemblyError(#[from] AssemblyError),
}

impl From<StoreApiError> for OrderAdminApiError {
    fn from(e: StoreApiError) -> Self {
        match e {
            StoreApiError::DatabaseError(e) => OrderAdminApiError::DatabaseError(e),
            StoreApiError::QueryError(e) => OrderAdminApiError::QueryError(e),
        }
    }
}

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use storefront_admin_engine::OrderAdminApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Order data is inconsistent. {0}")]
    DataIntegrityError(String),
    #[error("Could not render the page. {0}")]
    RenderError(String),
    #[error("Page not found.")]
    PageNotFound,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::PageNotFound => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::DataIntegrityError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RenderError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // The message is the entire response body. Clients get the status code and the text, nothing more
        // structured than that.
        HttpResponse::build(self.status_code()).insert_header(ContentType::plaintext()).body(self.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No active admin session.")]
    NotLoggedIn,
    #[error("Missing or invalid API key.")]
    InvalidApiKey,
}

impl From<OrderAdminApiError> for ServerError {
    fn from(e: OrderAdminApiError) -> Self {
        match e {
            OrderAdminApiError::OrderNotFound(id) => Self::NoRecordFound(format!("Order {id} not found")),
            // The single-order flow carries no missing-user guard; a dangling purchaser reference surfaces as an
            // unexpected error.
            OrderAdminApiError::UserNotFound(_) => Self::Unspecified(e.to_string()),
            OrderAdminApiError::AssemblyError(_) => Self::DataIntegrityError(e.to_string()),
            OrderAdminApiError::DatabaseError(msg) => Self::BackendError(format!("Database error: {msg}")),
            OrderAdminApiError::QueryError(msg) => Self::BackendError(msg),
        }
    }
}

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product {0} not found")]
    ProductNotFound(Uuid),

    #[error("Product option {0} not found")]
    OptionNotFound(Uuid),

    #[error("Product option payload is required")]
    MissingOptionPayload,

    #[error("An option with this id already exists")]
    DuplicateOption(Uuid),

    #[error("No records updated")]
    NoRecordsUpdated,

    #[error("Body id {body} does not match path id {path}")]
    IdMismatch { path: Uuid, body: Uuid },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::ProductNotFound(_)
            | ProductError::OptionNotFound(_)
            | ProductError::MissingOptionPayload => AppError::NotFound(err.to_string()),
            ProductError::DuplicateOption(_) => AppError::Conflict(err.to_string()),
            ProductError::IdMismatch { .. } => AppError::BadRequest(err.to_string()),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::NoRecordsUpdated => AppError::InternalServerError(err.to_string()),
            // Driver text stays in the logs; clients get a generic message.
            ProductError::Database(err) => AppError::Database(err),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

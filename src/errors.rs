use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown product {0}")]
    UnknownProduct(i64),

    #[error("Insufficient stock for product {0}")]
    InsufficientStock(i64),

    #[error("Stock for product {0} is busy, retry the request")]
    Conflict(i64),

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::AuthenticationRequired => AppError::Unauthorized,
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::UnknownProduct(id) => AppError::UnknownProduct(id),
            DomainError::InsufficientStock(id) => AppError::InsufficientStock(id),
            DomainError::TransientStoreConflict { product_id, .. } => {
                AppError::Conflict(product_id)
            }
            DomainError::NotFound => AppError::NotFound,
            DomainError::Arithmetic => AppError::Internal("order total overflowed".to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "authentication_required",
            AppError::Validation(_) => "validation_error",
            AppError::UnknownProduct(_) => "unknown_product",
            AppError::InsufficientStock(_) => "insufficient_stock",
            AppError::Conflict(_) => "transient_store_conflict",
            AppError::NotFound => "not_found",
            AppError::Internal(_) => "internal_error",
        }
    }

    fn product_id(&self) -> Option<i64> {
        match self {
            AppError::UnknownProduct(id)
            | AppError::InsufficientStock(id)
            | AppError::Conflict(id) => Some(*id),
            _ => None,
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) | AppError::UnknownProduct(_) => StatusCode::BAD_REQUEST,
            AppError::InsufficientStock(_) => StatusCode::CONFLICT,
            AppError::Conflict(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Internal(detail) => {
                log::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut body = json!({
            "error": self.code(),
            "message": message,
        });
        if let Some(id) = self.product_id() {
            body["product_id"] = json!(id);
        }

        let mut response = HttpResponse::build(self.status_code());
        if matches!(self, AppError::Conflict(_)) {
            response.insert_header((header::RETRY_AFTER, "1"));
        }
        response.json(body)
    }
}

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Authentication required")]
    AuthenticationRequired,
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Unknown product {0}")]
    UnknownProduct(i64),
    #[error("Insufficient stock for product {0}")]
    InsufficientStock(i64),
    #[error("Stock reservation for product {product_id} kept conflicting after {attempts} attempts")]
    TransientStoreConflict { product_id: i64, attempts: u32 },
    #[error("Order total overflowed")]
    Arithmetic,
    #[error("Not found")]
    NotFound,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Stable label used for metrics and structured responses.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::AuthenticationRequired => "authentication_required",
            DomainError::Validation(_) => "validation_error",
            DomainError::UnknownProduct(_) => "unknown_product",
            DomainError::InsufficientStock(_) => "insufficient_stock",
            DomainError::TransientStoreConflict { .. } => "transient_store_conflict",
            DomainError::Arithmetic => "arithmetic_error",
            DomainError::NotFound => "not_found",
            DomainError::Internal(_) => "internal_error",
        }
    }

    /// The product the failure is about, when there is one.
    pub fn product_id(&self) -> Option<i64> {
        match self {
            DomainError::UnknownProduct(id) | DomainError::InsufficientStock(id) => Some(*id),
            DomainError::TransientStoreConflict { product_id, .. } => Some(*product_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_is_reported_for_reservation_failures() {
        assert_eq!(DomainError::UnknownProduct(999).product_id(), Some(999));
        assert_eq!(DomainError::InsufficientStock(1).product_id(), Some(1));
        assert_eq!(
            DomainError::TransientStoreConflict {
                product_id: 7,
                attempts: 3
            }
            .product_id(),
            Some(7)
        );
        assert_eq!(DomainError::Arithmetic.product_id(), None);
    }

    #[test]
    fn display_names_the_product() {
        assert_eq!(
            DomainError::InsufficientStock(2).to_string(),
            "Insufficient stock for product 2"
        );
        assert_eq!(DomainError::UnknownProduct(999).to_string(), "Unknown product 999");
    }
}

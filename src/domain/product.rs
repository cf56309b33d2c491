use chrono::{DateTime, Utc};

use super::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub name: String,
    pub price_cents: i64,
    pub stock: i32,
}

impl ProductInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("name must not be empty".to_string()));
        }
        if self.name.chars().count() > 255 {
            return Err(DomainError::Validation(
                "name must be at most 255 characters".to_string(),
            ));
        }
        if self.price_cents < 0 {
            return Err(DomainError::Validation(
                "price_cents must not be negative".to_string(),
            ));
        }
        if self.stock < 0 {
            return Err(DomainError::Validation("stock must not be negative".to_string()));
        }
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

/// One raw `(product_id, qty)` pair as received from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedItem {
    pub product_id: i64,
    pub qty: i64,
}

/// Canonical line item: validated, at most one per product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    pub product_id: i64,
    pub qty: i32,
}

/// A reserved line item together with its price snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i64,
    pub qty: i32,
    pub price_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemView {
    pub id: Uuid,
    pub product_id: i64,
    pub qty: i32,
    pub price_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub total_cents: i64,
    pub items: Vec<OrderItemView>,
}

/// Sum of `qty * price_cents`, failing instead of wrapping on overflow.
pub fn order_total(lines: &[PricedLine]) -> Result<i64, DomainError> {
    lines
        .iter()
        .try_fold(0i64, |acc, line| {
            line.price_cents
                .checked_mul(i64::from(line.qty))
                .and_then(|subtotal| acc.checked_add(subtotal))
        })
        .ok_or(DomainError::Arithmetic)
}

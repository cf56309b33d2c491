use super::errors::DomainError;
use super::order::{LineItem, RequestedItem};

/// Validate a raw item list and merge duplicate products by summing their
/// quantities.
///
/// The result keeps the order in which each product first appeared. Pure:
/// no I/O happens here.
pub fn normalize(items: &[RequestedItem]) -> Result<Vec<LineItem>, DomainError> {
    if items.is_empty() {
        return Err(DomainError::Validation("items must not be empty".to_string()));
    }

    let mut lines: Vec<LineItem> = Vec::with_capacity(items.len());
    for item in items {
        if item.product_id <= 0 {
            return Err(DomainError::Validation(format!(
                "product_id must be a positive integer, got {}",
                item.product_id
            )));
        }
        if item.qty <= 0 {
            return Err(DomainError::Validation(format!(
                "qty for product {} must be positive, got {}",
                item.product_id, item.qty
            )));
        }
        let qty = i32::try_from(item.qty).map_err(|_| quantity_too_large(item.product_id))?;

        match lines.iter_mut().find(|l| l.product_id == item.product_id) {
            Some(line) => {
                line.qty = line
                    .qty
                    .checked_add(qty)
                    .ok_or_else(|| quantity_too_large(item.product_id))?;
            }
            None => lines.push(LineItem {
                product_id: item.product_id,
                qty,
            }),
        }
    }

    Ok(lines)
}

fn quantity_too_large(product_id: i64) -> DomainError {
    DomainError::Validation(format!("qty for product {} is too large", product_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(product_id: i64, qty: i64) -> RequestedItem {
        RequestedItem { product_id, qty }
    }

    fn line(product_id: i64, qty: i32) -> LineItem {
        LineItem { product_id, qty }
    }

    #[test]
    fn duplicate_products_are_consolidated() {
        let lines = normalize(&[req(1, 2), req(2, 1), req(1, 3)]).expect("valid request");
        assert_eq!(lines, vec![line(1, 5), line(2, 1)]);
    }

    #[test]
    fn first_appearance_order_is_kept() {
        let lines = normalize(&[req(9, 1), req(3, 1), req(9, 1)]).expect("valid request");
        assert_eq!(lines, vec![line(9, 2), line(3, 1)]);
    }

    #[test]
    fn consolidation_does_not_depend_on_input_order() {
        let a = normalize(&[req(1, 2), req(2, 1), req(1, 3)]).expect("valid request");
        let mut b = normalize(&[req(2, 1), req(1, 3), req(1, 2)]).expect("valid request");
        b.sort_by_key(|l| l.product_id);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(matches!(normalize(&[]), Err(DomainError::Validation(_))));
    }

    #[test]
    fn zero_and_negative_quantities_are_rejected() {
        assert!(matches!(
            normalize(&[req(1, 0)]),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            normalize(&[req(1, 2), req(1, -1)]),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn malformed_product_id_is_rejected() {
        assert!(matches!(
            normalize(&[req(0, 1)]),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            normalize(&[req(-4, 1)]),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn quantity_sum_overflow_is_rejected() {
        let result = normalize(&[req(1, i64::from(i32::MAX)), req(1, 1)]);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn quantity_beyond_storage_range_is_rejected() {
        let result = normalize(&[req(1, i64::from(i32::MAX) + 1)]);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}

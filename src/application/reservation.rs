use crate::domain::errors::DomainError;
use crate::domain::order::{LineItem, PricedLine};
use crate::domain::ports::{InventoryLedger, ReserveOutcome};
use crate::metrics::OrderMetrics;

pub const DEFAULT_RESERVE_ATTEMPTS: u32 = 3;

/// How often a single conditional decrement is retried after a store
/// conflict before the order is given up as transiently failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RESERVE_ATTEMPTS,
        }
    }
}

/// Reserve stock for every line or fail on the first line that cannot be
/// reserved.
///
/// Lines are processed in ascending `product_id` order so that concurrent
/// orders touching the same products take row guards in the same order.
/// Undoing the reservations already made on failure is the caller's unit
/// of work's job: this function never compensates by itself.
pub fn reserve_all<L>(
    ledger: &mut L,
    lines: &[LineItem],
    retry: RetryPolicy,
    metrics: &dyn OrderMetrics,
) -> Result<Vec<PricedLine>, DomainError>
where
    L: InventoryLedger + ?Sized,
{
    let mut sorted = lines.to_vec();
    sorted.sort_by_key(|line| line.product_id);

    let mut reserved = Vec::with_capacity(sorted.len());
    for line in sorted {
        let price_cents = ledger
            .read_price(line.product_id)?
            .ok_or(DomainError::UnknownProduct(line.product_id))?;

        reserve_line(ledger, line, retry, metrics)?;

        reserved.push(PricedLine {
            product_id: line.product_id,
            qty: line.qty,
            price_cents,
        });
    }
    Ok(reserved)
}

fn reserve_line<L>(
    ledger: &mut L,
    line: LineItem,
    retry: RetryPolicy,
    metrics: &dyn OrderMetrics,
) -> Result<(), DomainError>
where
    L: InventoryLedger + ?Sized,
{
    let attempts = retry.max_attempts.max(1);
    for attempt in 1..=attempts {
        match ledger.try_reserve(line.product_id, line.qty)? {
            ReserveOutcome::Reserved => return Ok(()),
            ReserveOutcome::InsufficientStock => {
                return Err(DomainError::InsufficientStock(line.product_id))
            }
            // The row vanished between the price read and the decrement.
            ReserveOutcome::NotFound => return Err(DomainError::UnknownProduct(line.product_id)),
            ReserveOutcome::Conflict => {
                metrics.reservation_conflict();
                log::debug!(
                    "Reservation conflict on product {} (attempt {}/{})",
                    line.product_id,
                    attempt,
                    attempts
                );
            }
        }
    }
    Err(DomainError::TransientStoreConflict {
        product_id: line.product_id,
        attempts,
    })
}

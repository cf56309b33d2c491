use crate::domain::errors::DomainError;
use crate::domain::identity::CallerIdentity;
use crate::domain::order::{order_total, OrderView, PricedLine};
use crate::domain::ports::OrderRecorder;

/// Persist exactly one order for `caller` from already reserved, priced
/// lines. Must run inside the unit of work that made the reservations.
pub fn record_order<R>(
    recorder: &mut R,
    caller: &CallerIdentity,
    lines: &[PricedLine],
) -> Result<OrderView, DomainError>
where
    R: OrderRecorder + ?Sized,
{
    if lines.is_empty() {
        return Err(DomainError::Validation(
            "an order needs at least one item".to_string(),
        ));
    }
    let total_cents = order_total(lines)?;
    recorder.insert_order(caller.as_str(), total_cents, lines)
}

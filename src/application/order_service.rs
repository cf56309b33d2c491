use std::sync::Arc;

use uuid::Uuid;

use super::recorder::record_order;
use super::reservation::{reserve_all, RetryPolicy};
use crate::domain::errors::DomainError;
use crate::domain::identity::CallerIdentity;
use crate::domain::normalize::normalize;
use crate::domain::order::{OrderView, RequestedItem};
use crate::domain::ports::OrderStore;
use crate::metrics::OrderMetrics;

pub struct OrderService<S> {
    store: S,
    metrics: Arc<dyn OrderMetrics>,
    retry: RetryPolicy,
}

impl<S: OrderStore> OrderService<S> {
    pub fn new(store: S, metrics: Arc<dyn OrderMetrics>, retry: RetryPolicy) -> Self {
        Self {
            store,
            metrics,
            retry,
        }
    }

    /// Turn a raw item list into a committed order with reserved stock, or
    /// reject it leaving the store untouched.
    pub fn place_order(
        &self,
        caller: &CallerIdentity,
        items: &[RequestedItem],
    ) -> Result<OrderView, DomainError> {
        match self.try_place_order(caller, items) {
            Ok(order) => {
                self.metrics.order_created();
                log::info!(
                    "Created order {} for {} ({} items, total {} cents)",
                    order.id,
                    caller,
                    order.items.len(),
                    order.total_cents
                );
                Ok(order)
            }
            Err(e) => {
                self.metrics.order_rejected(&e);
                match &e {
                    DomainError::Internal(msg) => {
                        log::error!("Order for {} failed: {}", caller, msg)
                    }
                    other => log::warn!(
                        "Rejected order for {}: {} (product {:?})",
                        caller,
                        other.kind(),
                        other.product_id()
                    ),
                }
                Err(e)
            }
        }
    }

    fn try_place_order(
        &self,
        caller: &CallerIdentity,
        items: &[RequestedItem],
    ) -> Result<OrderView, DomainError> {
        let lines = normalize(items)?;
        let retry = self.retry;
        let metrics = self.metrics.as_ref();

        self.store.in_transaction(|uow| {
            let priced = reserve_all(uow, &lines, retry, metrics)?;
            record_order(uow, caller, &priced)
        })
    }

    pub fn list_orders(&self, caller: &CallerIdentity) -> Result<Vec<OrderView>, DomainError> {
        self.store.list_for_user(caller.as_str())
    }

    pub fn get_order(
        &self,
        caller: &CallerIdentity,
        order_id: Uuid,
    ) -> Result<OrderView, DomainError> {
        self.store
            .find_for_user(caller.as_str(), order_id)?
            .ok_or(DomainError::NotFound)
    }
}

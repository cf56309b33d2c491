//! In-memory store implementing the order and catalog ports.
//!
//! A transaction runs against a private copy of the whole state and swaps it
//! in only when the work succeeds, so a failed order leaves nothing behind.
//! Transactions are serialized by a single mutex. Clone-friendly via Arc.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{OrderItemView, OrderView, PricedLine};
use crate::domain::ports::{
    CatalogRepository, InventoryLedger, OrderRecorder, OrderStore, ReserveOutcome, UnitOfWork,
};
use crate::domain::product::{Product, ProductInput};

#[derive(Debug, Clone, Default)]
struct State {
    products: BTreeMap<i64, Product>,
    last_product_id: i64,
    /// Insertion order, oldest first.
    orders: Vec<OrderView>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

struct MemoryUnitOfWork<'a> {
    state: &'a mut State,
}

impl InventoryLedger for MemoryUnitOfWork<'_> {
    fn read_price(&mut self, product_id: i64) -> Result<Option<i64>, DomainError> {
        Ok(self.state.products.get(&product_id).map(|p| p.price_cents))
    }

    fn try_reserve(&mut self, product_id: i64, qty: i32) -> Result<ReserveOutcome, DomainError> {
        let Some(product) = self.state.products.get_mut(&product_id) else {
            return Ok(ReserveOutcome::NotFound);
        };
        if product.stock < qty {
            return Ok(ReserveOutcome::InsufficientStock);
        }
        product.stock -= qty;
        Ok(ReserveOutcome::Reserved)
    }
}

impl OrderRecorder for MemoryUnitOfWork<'_> {
    fn insert_order(
        &mut self,
        user_id: &str,
        total_cents: i64,
        lines: &[PricedLine],
    ) -> Result<OrderView, DomainError> {
        let order = OrderView {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
            total_cents,
            items: lines
                .iter()
                .map(|l| OrderItemView {
                    id: Uuid::new_v4(),
                    product_id: l.product_id,
                    qty: l.qty,
                    price_cents: l.price_cents,
                })
                .collect(),
        };
        self.state.orders.push(order.clone());
        Ok(order)
    }
}

impl OrderStore for InMemoryStore {
    fn in_transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, DomainError>,
    {
        let mut state = self.state.lock();
        let mut draft = state.clone();
        let uow: &mut dyn UnitOfWork = &mut MemoryUnitOfWork { state: &mut draft };
        let out = work(uow)?;
        *state = draft;
        Ok(out)
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<OrderView>, DomainError> {
        let state = self.state.lock();
        Ok(state
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    fn find_for_user(
        &self,
        user_id: &str,
        order_id: Uuid,
    ) -> Result<Option<OrderView>, DomainError> {
        let state = self.state.lock();
        Ok(state
            .orders
            .iter()
            .find(|o| o.id == order_id && o.user_id == user_id)
            .cloned())
    }
}

impl CatalogRepository for InMemoryStore {
    fn list(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.state.lock().products.values().cloned().collect())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        Ok(self.state.lock().products.get(&id).cloned())
    }

    fn create(&self, input: &ProductInput) -> Result<Product, DomainError> {
        let mut state = self.state.lock();
        state.last_product_id += 1;
        let product = Product {
            id: state.last_product_id,
            name: input.name.clone(),
            price_cents: input.price_cents,
            stock: input.stock,
            created_at: Utc::now(),
        };
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    fn update(&self, id: i64, input: &ProductInput) -> Result<Option<Product>, DomainError> {
        let mut state = self.state.lock();
        Ok(state.products.get_mut(&id).map(|product| {
            product.name = input.name.clone();
            product.price_cents = input.price_cents;
            product.stock = input.stock;
            product.clone()
        }))
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.state.lock().products.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(stock: i32) -> (InMemoryStore, i64) {
        let store = InMemoryStore::new();
        let product = store
            .create(&ProductInput {
                name: "widget".to_string(),
                price_cents: 250,
                stock,
            })
            .expect("create");
        (store, product.id)
    }

    #[test]
    fn failed_transaction_discards_every_change() {
        let (store, id) = seeded(5);

        let result: Result<(), DomainError> = store.in_transaction(|uow| {
            assert_eq!(uow.try_reserve(id, 3)?, ReserveOutcome::Reserved);
            let line = PricedLine {
                product_id: id,
                qty: 3,
                price_cents: 250,
            };
            uow.insert_order("alice", 750, &[line])?;
            Err(DomainError::InsufficientStock(id))
        });

        assert!(result.is_err());
        assert_eq!(store.find_by_id(id).expect("find").expect("exists").stock, 5);
        assert!(store.list_for_user("alice").expect("list").is_empty());
    }

    #[test]
    fn reservation_never_goes_below_zero() {
        let (store, id) = seeded(2);

        let outcome = store
            .in_transaction(|uow| uow.try_reserve(id, 3))
            .expect("transaction");

        assert_eq!(outcome, ReserveOutcome::InsufficientStock);
        assert_eq!(store.find_by_id(id).expect("find").expect("exists").stock, 2);
    }

    #[test]
    fn reserving_missing_product_reports_not_found() {
        let store = InMemoryStore::new();
        let outcome = store
            .in_transaction(|uow| uow.try_reserve(77, 1))
            .expect("transaction");
        assert_eq!(outcome, ReserveOutcome::NotFound);
    }

    #[test]
    fn product_ids_are_not_reused_after_delete() {
        let (store, id) = seeded(1);
        assert!(store.delete(id).expect("delete"));
        let next = store
            .create(&ProductInput {
                name: "other".to_string(),
                price_cents: 1,
                stock: 1,
            })
            .expect("create");
        assert_ne!(next.id, id);
    }
}

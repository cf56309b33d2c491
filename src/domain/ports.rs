use uuid::Uuid;

use super::errors::DomainError;
use super::order::{OrderView, PricedLine};
use super::product::{Product, ProductInput};

/// Result of a single conditional stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    Reserved,
    InsufficientStock,
    NotFound,
    /// The store detected a concurrent write and undid this decrement only.
    Conflict,
}

/// Sole mutator of product stock, scoped to an open unit of work.
pub trait InventoryLedger {
    fn read_price(&mut self, product_id: i64) -> Result<Option<i64>, DomainError>;

    /// Decrement stock by `qty` only if at least `qty` units are available.
    /// The check and the decrement must be one atomic step.
    fn try_reserve(&mut self, product_id: i64, qty: i32) -> Result<ReserveOutcome, DomainError>;
}

/// Writes the order header and its items inside the same unit of work.
pub trait OrderRecorder {
    fn insert_order(
        &mut self,
        user_id: &str,
        total_cents: i64,
        lines: &[PricedLine],
    ) -> Result<OrderView, DomainError>;
}

pub trait UnitOfWork: InventoryLedger + OrderRecorder {}

impl<T: InventoryLedger + OrderRecorder> UnitOfWork for T {}

pub trait OrderStore: Send + Sync + 'static {
    /// Run `work` atomically: everything it did is committed if it returns
    /// `Ok`, and nothing survives if it returns `Err`.
    fn in_transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, DomainError>;

    /// All orders of `user_id`, newest first, each with its items.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<OrderView>, DomainError>;

    fn find_for_user(&self, user_id: &str, order_id: Uuid)
        -> Result<Option<OrderView>, DomainError>;
}

pub trait CatalogRepository: Send + Sync + 'static {
    fn list(&self) -> Result<Vec<Product>, DomainError>;
    fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError>;
    fn create(&self, input: &ProductInput) -> Result<Product, DomainError>;
    fn update(&self, id: i64, input: &ProductInput) -> Result<Option<Product>, DomainError>;
    fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

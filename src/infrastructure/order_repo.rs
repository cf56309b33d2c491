use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderView, PricedLine};
use crate::domain::ports::{InventoryLedger, OrderRecorder, OrderStore, ReserveOutcome, UnitOfWork};
use crate::schema::{order_items, orders, products};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Unit of work ─────────────────────────────────────────────────────────────

/// Ledger and recorder bound to one open Postgres transaction.
struct PgUnitOfWork<'c> {
    conn: &'c mut PgConnection,
}

impl InventoryLedger for PgUnitOfWork<'_> {
    fn read_price(&mut self, product_id: i64) -> Result<Option<i64>, DomainError> {
        // Locks the row for the rest of the transaction, so the price we
        // snapshot is the price of the stock we are about to take.
        let price = products::table
            .filter(products::id.eq(product_id))
            .select(products::price_cents)
            .for_update()
            .first::<i64>(self.conn)
            .optional()?;
        Ok(price)
    }

    fn try_reserve(&mut self, product_id: i64, qty: i32) -> Result<ReserveOutcome, DomainError> {
        // Savepoint: a conflict undoes this decrement only, not the order.
        let decrement = self.conn.transaction::<usize, DieselError, _>(|conn| {
            diesel::update(
                products::table
                    .filter(products::id.eq(product_id))
                    .filter(products::stock.ge(qty)),
            )
            .set(products::stock.eq(products::stock - qty))
            .execute(conn)
        });

        match decrement {
            Ok(0) => {
                let found = diesel::select(exists(
                    products::table.filter(products::id.eq(product_id)),
                ))
                .get_result::<bool>(self.conn)?;
                Ok(if found {
                    ReserveOutcome::InsufficientStock
                } else {
                    ReserveOutcome::NotFound
                })
            }
            Ok(_) => Ok(ReserveOutcome::Reserved),
            // Not raised under READ COMMITTED while read_price holds the row lock; only
            // reachable if the database runs this transaction at a stricter isolation level.
            Err(DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, info)) => {
                log::debug!(
                    "Serialization failure reserving product {}: {}",
                    product_id,
                    info.message()
                );
                Ok(ReserveOutcome::Conflict)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl OrderRecorder for PgUnitOfWork<'_> {
    fn insert_order(
        &mut self,
        user_id: &str,
        total_cents: i64,
        lines: &[PricedLine],
    ) -> Result<OrderView, DomainError> {
        // 1. Insert the order header; created_at comes from the database.
        let order: OrderRow = diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                id: Uuid::new_v4(),
                user_id,
                total_cents,
            })
            .returning(OrderRow::as_returning())
            .get_result(self.conn)?;

        // 2. Insert the priced items.
        let new_items: Vec<NewOrderItemRow> = lines
            .iter()
            .map(|l| NewOrderItemRow {
                id: Uuid::new_v4(),
                order_id: order.id,
                product_id: l.product_id,
                qty: l.qty,
                price_cents: l.price_cents,
            })
            .collect();
        let mut items: Vec<OrderItemRow> = diesel::insert_into(order_items::table)
            .values(&new_items)
            .returning(OrderItemRow::as_returning())
            .get_results(self.conn)?;
        items.sort_by_key(|i| i.product_id);

        Ok(order.into_view(items))
    }
}

// ── Store ────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DieselOrderStore {
    pool: DbPool,
    statement_timeout_ms: u64,
}

impl DieselOrderStore {
    pub fn new(pool: DbPool, statement_timeout_ms: u64) -> Self {
        Self {
            pool,
            statement_timeout_ms,
        }
    }
}

impl OrderStore for DieselOrderStore {
    fn in_transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, DomainError>,
    {
        let mut pooled = self.pool.get()?;
        let conn: &mut PgConnection = &mut pooled;
        let timeout_ms = self.statement_timeout_ms;

        conn.transaction::<_, DomainError, _>(|conn| {
            // A statement running past the deadline aborts and rolls back the
            // whole transaction, reservations included.
            diesel::sql_query(format!("SET LOCAL statement_timeout = {}", timeout_ms))
                .execute(conn)?;

            let uow: &mut dyn UnitOfWork = &mut PgUnitOfWork { conn };
            work(uow)
        })
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order_rows: Vec<OrderRow> = orders::table
            .filter(orders::user_id.eq(user_id))
            .order((orders::created_at.desc(), orders::id.desc()))
            .select(OrderRow::as_select())
            .load(&mut conn)?;

        let items: Vec<OrderItemRow> = OrderItemRow::belonging_to(&order_rows)
            .select(OrderItemRow::as_select())
            .order(order_items::product_id.asc())
            .load(&mut conn)?;

        let grouped = items.grouped_by(&order_rows);
        Ok(order_rows
            .into_iter()
            .zip(grouped)
            .map(|(order, items)| order.into_view(items))
            .collect())
    }

    fn find_for_user(
        &self,
        user_id: &str,
        order_id: Uuid,
    ) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order: Option<OrderRow> = orders::table
            .filter(orders::id.eq(order_id))
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items: Vec<OrderItemRow> = OrderItemRow::belonging_to(&order)
            .select(OrderItemRow::as_select())
            .order(order_items::product_id.asc())
            .load(&mut conn)?;

        Ok(Some(order.into_view(items)))
    }
}
